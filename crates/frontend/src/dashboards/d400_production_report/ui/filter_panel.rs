use super::super::state::{ReportKind, ReportPageState};
use crate::shared::components::date_range_picker::DateRangePicker;
use crate::shared::data::ReferenceData;
use contracts::dashboards::d400_production_report::ReportFilter;
use contracts::domain::a003_municipality::aggregate::regions;
use leptos::prelude::*;
use thaw::*;

/// Choices offered by the filter selects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub municipalities: Vec<String>,
    pub regions: Vec<String>,
    /// `(code, label)`
    pub producers: Vec<(String, String)>,
    pub colors: Vec<String>,
}

impl FilterOptions {
    pub fn from_reference(reference: &ReferenceData) -> Self {
        let mut producers: Vec<_> = reference
            .producers
            .iter()
            .filter(|p| !p.code.trim().is_empty())
            .collect();
        producers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));

        let mut colors: Vec<_> = reference.colors.iter().collect();
        colors.sort_by_key(|c| c.code);

        Self {
            municipalities: reference.municipality_names(),
            regions: regions(&reference.municipalities),
            producers: producers
                .into_iter()
                .map(|p| (p.code.clone(), p.display_label()))
                .collect(),
            colors: colors.into_iter().map(|c| c.name.clone()).collect(),
        }
    }
}

/// Select value to filter field; the blank option means "all"
fn selected(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn filter_select(
    label: &'static str,
    all_label: &'static str,
    options: Signal<Vec<(String, String)>>,
    current: Signal<String>,
    on_change: impl Fn(Option<String>) + 'static,
) -> impl IntoView {
    view! {
        <div class="filter-panel__field">
            <Label>{label}</Label>
            <select
                class="filter-panel__select"
                prop:value=current
                on:change=move |ev| on_change(selected(event_target_value(&ev)))
            >
                <option value="">{all_label}</option>
                {move || {
                    options
                        .get()
                        .into_iter()
                        .map(|(value, text)| {
                            let is_current = current.get_untracked() == value;
                            view! { <option value=value selected=is_current>{text}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

fn same_values(values: &[String]) -> Vec<(String, String)> {
    values.iter().map(|v| (v.clone(), v.clone())).collect()
}

#[component]
pub fn ReportFilterPanel(
    state: RwSignal<ReportPageState>,
    #[prop(into)]
    reference: Signal<ReferenceData>,
) -> impl IntoView {
    let options = Memo::new(move |_| reference.with(FilterOptions::from_reference));
    let field = move |get: fn(&ReportFilter) -> &Option<String>| {
        Signal::derive(move || state.with(|s| get(&s.filter).clone().unwrap_or_default()))
    };

    view! {
        <div class="filter-panel">
            <div class="filter-panel__row">
                <div class="filter-panel__field">
                    <Label>"Relatório"</Label>
                    <select
                        class="filter-panel__select"
                        prop:value=move || state.with(|s| s.kind.key())
                        on:change=move |ev| {
                            let key = event_target_value(&ev);
                            if let Some(kind) = ReportKind::all().into_iter().find(|k| k.key() == key) {
                                state.update(|s| s.kind = kind);
                            }
                        }
                    >
                        {ReportKind::all()
                            .into_iter()
                            .map(|k| view! { <option value=k.key()>{k.label()}</option> })
                            .collect_view()}
                    </select>
                </div>
                <DateRangePicker
                    date_from=field(|f| &f.date_from)
                    date_to=field(|f| &f.date_to)
                    on_change=Callback::new(move |(from, to): (String, String)| {
                        state.update(|s| {
                            s.filter.date_from = selected(from);
                            s.filter.date_to = selected(to);
                        })
                    })
                    label="Período"
                />
            </div>
            <div class="filter-panel__row">
                {filter_select(
                    "Município",
                    "Todos os municípios",
                    Signal::derive(move || options.with(|o| same_values(&o.municipalities))),
                    field(|f| &f.municipality),
                    move |v| state.update(|s| s.filter.municipality = v),
                )}
                {filter_select(
                    "Região",
                    "Todas as regiões",
                    Signal::derive(move || options.with(|o| same_values(&o.regions))),
                    field(|f| &f.region),
                    move |v| state.update(|s| s.filter.region = v),
                )}
                {filter_select(
                    "Produtor",
                    "Todos os produtores",
                    Signal::derive(move || options.with(|o| o.producers.clone())),
                    field(|f| &f.producer),
                    move |v| state.update(|s| s.filter.producer = v),
                )}
                {filter_select(
                    "Cor",
                    "Todas as cores",
                    Signal::derive(move || options.with(|o| same_values(&o.colors))),
                    field(|f| &f.color_name),
                    move |v| state.update(|s| s.filter.color_name = v),
                )}
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| state.update(|s| s.filter = ReportFilter::default())
                    disabled=Signal::derive(move || state.with(|s| s.filter.is_empty()))
                >
                    "Limpar filtros"
                </Button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_producer::Producer;
    use contracts::domain::a003_municipality::Municipality;
    use contracts::domain::a004_color::Color;
    use serde_json::json;

    fn producer(code: &str, name: &str) -> Producer {
        serde_json::from_value(json!({"id": 1, "codigo": code, "nome": name})).unwrap()
    }

    fn municipality(name: &str, region: &str) -> Municipality {
        Municipality {
            id: 1,
            name: name.into(),
            region: region.into(),
        }
    }

    #[test]
    fn test_options_are_sorted_and_clean() {
        let reference = ReferenceData {
            producers: vec![
                producer("P2", "Zé"),
                producer("", "Sem código"),
                producer("P1", "Ana"),
            ],
            municipalities: vec![
                municipality("Picos", "Sul"),
                municipality("Oeiras", "Centro"),
                municipality("Picos", "Sul"),
                municipality(" ", "Sul"),
            ],
            colors: vec![
                Color {
                    code: 3,
                    name: "Escuro".into(),
                    hex: String::new(),
                },
                Color {
                    code: 1,
                    name: "Claro".into(),
                    hex: String::new(),
                },
            ],
            communities: Vec::new(),
        };
        let o = FilterOptions::from_reference(&reference);
        assert_eq!(o.municipalities, vec!["Oeiras", "Picos"]);
        assert_eq!(o.regions, vec!["Centro", "Sul"]);
        let codes: Vec<&str> = o.producers.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["P1", "P2"]);
        assert_eq!(o.colors, vec!["Claro", "Escuro"]);
    }

    #[test]
    fn test_blank_selection_clears_field() {
        assert_eq!(selected(String::new()), None);
        assert_eq!(selected("Picos".into()), Some("Picos".to_string()));
    }
}
