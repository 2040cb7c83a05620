//! Search, sort and paging helpers shared by the list pages
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Queries shorter than this do not filter
pub const MIN_QUERY_LEN: usize = 3;

const DEBOUNCE_MS: u32 = 300;

pub trait Searchable {
    /// Case-insensitive match of `filter` against the searchable fields
    fn matches_filter(&self, filter: &str) -> bool;
}

pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

fn query_active(filter: &str) -> bool {
    filter.trim().chars().count() >= MIN_QUERY_LEN
}

/// `true` when any of `fields` contains `filter`, ignoring case
pub fn any_field_contains(fields: &[&str], filter: &str) -> bool {
    let needle = filter.trim().to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// Wrap every case-insensitive occurrence of `filter` in a highlight span
pub fn highlight_matches(text: &str, filter: &str) -> AnyView {
    if !query_active(filter) {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let needle = filter.trim().to_lowercase();
    let lower = text.to_lowercase();
    // lowercasing can change byte lengths outside ASCII; fall back to plain text then
    if lower.len() != text.len() || !lower.contains(&needle) {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let mut parts: Vec<AnyView> = Vec::new();
    let mut last = 0;
    while let Some(pos) = lower[last..].find(&needle) {
        let start = last + pos;
        let end = start + needle.len();
        if start > last {
            parts.push(view! { <span>{text[last..start].to_string()}</span> }.into_any());
        }
        parts.push(view! { <mark class="search-highlight">{text[start..end].to_string()}</mark> }.into_any());
        last = end;
    }
    if last < text.len() {
        parts.push(view! { <span>{text[last..].to_string()}</span> }.into_any());
    }

    view! { <>{parts}</> }.into_any()
}

pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

pub fn filter_list<T: Searchable>(items: Vec<T>, filter: &str) -> Vec<T> {
    if !query_active(filter) {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.matches_filter(filter))
        .collect()
}

/// Number of pages for `count` rows, at least one
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Rows of the zero-based `page`
pub fn page_slice<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let start = page.saturating_mul(page_size);
    items
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect()
}

/// Search, sort and paging selection of a list page. Persisted per list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
}

impl ListQuery {
    pub fn sorted_by(field: &str, ascending: bool) -> Self {
        Self {
            search: String::new(),
            sort_field: field.to_string(),
            sort_ascending: ascending,
            page: 0,
            page_size: 25,
        }
    }

    /// Same field flips direction, a new field sorts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_field == field {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_field = field.to_string();
            self.sort_ascending = true;
        }
    }
}

/// One rendered page of a list
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    /// Requested page clamped to the last one
    pub page: usize,
}

/// Every row matching `query`, in display order. Exports use this too.
pub fn filtered_sorted<T>(items: &[T], query: &ListQuery) -> Vec<T>
where
    T: Searchable + Sortable + Clone,
{
    let mut rows = filter_list(items.to_vec(), &query.search);
    sort_list(&mut rows, &query.sort_field, query.sort_ascending);
    rows
}

/// Filter, sort and cut `items` according to `query`
pub fn visible_page<T>(items: &[T], query: &ListQuery) -> PageView<T>
where
    T: Searchable + Sortable + Clone,
{
    let rows = filtered_sorted(items, query);
    let total_count = rows.len();
    let total_pages = total_pages(total_count, query.page_size);
    let page = query.page.min(total_pages - 1);
    PageView {
        items: page_slice(&rows, page, query.page_size),
        total_count,
        total_pages,
        page,
    }
}

/// Search box with a debounce and a clear button
#[component]
pub fn SearchInput(
    #[prop(into)]
    value: Signal<String>,
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Buscar (mín. 3 caracteres)...".to_string()
    } else {
        placeholder
    };

    let input_value = RwSignal::new(value.get_untracked());
    // replacing the pending timeout drops, and so cancels, the previous one
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input = move |new_value: String| {
        input_value.set(new_value.clone());
        let timeout = Timeout::new(DEBOUNCE_MS, move || on_change.run(new_value));
        pending.set_value(Some(timeout));
    };

    let clear = move |_| {
        pending.set_value(None);
        input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                class="search-input__field"
                class:search-input__field--active=move || query_active(&value.get())
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" title="Limpar" on:click=clear>
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sortable-header table__sortable-header--active"
    } else {
        "table__sortable-header"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(&'static str, i32);

    impl Searchable for Row {
        fn matches_filter(&self, filter: &str) -> bool {
            any_field_contains(&[self.0], filter)
        }
    }

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "n" => self.1.cmp(&other.1),
                _ => self.0.cmp(other.0),
            }
        }
    }

    #[test]
    fn test_filter_ignores_short_queries() {
        let rows = vec![Row("Maria", 1), Row("José", 2)];
        assert_eq!(filter_list(rows.clone(), "ma").len(), 2);
        assert_eq!(filter_list(rows, "MAR"), vec![Row("Maria", 1)]);
    }

    #[test]
    fn test_sort_both_directions() {
        let mut rows = vec![Row("b", 2), Row("a", 3), Row("c", 1)];
        sort_list(&mut rows, "n", true);
        assert_eq!(rows[0], Row("c", 1));
        sort_list(&mut rows, "name", false);
        assert_eq!(rows[0], Row("c", 1));
        assert_eq!(rows[2], Row("a", 3));
    }

    #[test]
    fn test_paging() {
        let items: Vec<i32> = (1..=25).collect();
        assert_eq!(total_pages(items.len(), 10), 3);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(page_slice(&items, 2, 10), vec![21, 22, 23, 24, 25]);
        assert!(page_slice(&items, 5, 10).is_empty());
    }

    #[test]
    fn test_visible_page_clamps_page() {
        let rows: Vec<Row> = ["ana", "bia", "caio", "davi", "eva"]
            .iter()
            .zip(1..)
            .map(|(n, i)| Row(*n, i))
            .collect();
        let mut query = ListQuery::sorted_by("n", false);
        query.page_size = 2;
        query.page = 9;
        let view = visible_page(&rows, &query);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.page, 2);
        assert_eq!(view.items, vec![Row("ana", 1)]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut query = ListQuery::sorted_by("name", true);
        query.toggle_sort("name");
        assert!(!query.sort_ascending);
        query.toggle_sort("code");
        assert_eq!(query.sort_field, "code");
        assert!(query.sort_ascending);
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("name", "name", true), " ▲");
        assert_eq!(get_sort_indicator("name", "name", false), " ▼");
        assert_eq!(get_sort_indicator("name", "code", true), " ⇅");
    }
}
