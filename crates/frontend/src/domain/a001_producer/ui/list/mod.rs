mod state;

use contracts::domain::a001_producer::{Producer, ProducerStatus};
use contracts::domain::common::AggregateRoot;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::{detail_tab_label, producer_detail_key};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::data::use_repository;
use crate::shared::date_utils::today_iso;
use crate::shared::export::{export_filename, export_to_csv, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    any_field_contains, filtered_sorted, get_sort_class, get_sort_indicator, highlight_matches,
    visible_page, SearchInput, Searchable, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::state::{use_shared_tables, LoadState, LoadStateSignal};
use state::create_state;

impl Searchable for Producer {
    fn matches_filter(&self, filter: &str) -> bool {
        let community = self.community.as_deref().unwrap_or("");
        any_field_contains(
            &[
                self.code.as_str(),
                self.name.as_str(),
                self.cpf.as_str(),
                self.municipality.as_str(),
                community,
            ],
            filter,
        )
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl Sortable for Producer {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "code" => cmp_text(&self.code, &other.code),
            "cpf" => self.cpf.cmp(&other.cpf),
            "municipality" => cmp_text(&self.municipality, &other.municipality),
            "community" => cmp_text(
                self.community.as_deref().unwrap_or(""),
                other.community.as_deref().unwrap_or(""),
            ),
            "status" => self.status.label().cmp(other.status.label()),
            "hive_count" => self.hive_count.cmp(&other.hive_count),
            _ => cmp_text(&self.name, &other.name),
        }
    }
}

impl CsvExportable for Producer {
    fn headers() -> Vec<&'static str> {
        vec![
            "Código",
            "Nome",
            "CPF",
            "Município",
            "Comunidade",
            "Situação",
            "Data de filiação",
            "Colmeias",
            "Telefone",
            "E-mail",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.cpf.clone(),
            self.municipality.clone(),
            self.community.clone().unwrap_or_default(),
            self.status.label().to_string(),
            self.affiliation_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
            self.hive_count.map(|n| n.to_string()).unwrap_or_default(),
            self.phone.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
        ]
    }
}

/// Empty filter keeps every producer
fn status_matches(producer: &Producer, status: &str) -> bool {
    status.is_empty() || producer.status.as_str() == status
}

fn status_badge(status: ProducerStatus) -> &'static str {
    match status {
        ProducerStatus::Ativo => "badge badge--success",
        ProducerStatus::Inativo => "badge badge--neutral",
        ProducerStatus::Suspenso => "badge badge--warning",
    }
}

#[component]
pub fn ProducerList() -> impl IntoView {
    let repo = use_repository();
    let tables = use_shared_tables();
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let query = create_state();
    let status_filter = RwSignal::new(String::new());
    let load_state = RwSignal::new(LoadState::Idle);
    let (export_error, set_export_error) = signal::<Option<String>>(None);

    let load_data = move || {
        if !load_state.try_begin() {
            return;
        }
        let repo = repo.clone();
        spawn_local(async move {
            match repo.fetch_producers().await {
                Ok(producers) => {
                    tables.producers.set(producers);
                    load_state.succeed();
                }
                Err(e) => {
                    load_state.fail(format!("Não foi possível carregar os produtores: {}", e))
                }
            }
        });
    };
    load_data();

    let filtered = Memo::new(move |_| {
        let status = status_filter.get();
        tables.producers.with(|all| {
            all.iter()
                .filter(|p| status_matches(p, &status))
                .cloned()
                .collect::<Vec<_>>()
        })
    });
    let page = Memo::new(move |_| filtered.with(|items| query.with(|q| visible_page(items, q))));

    let open_details = move |producer: &Producer| {
        tabs_store.open_tab(
            &producer_detail_key(producer.id),
            &detail_tab_label(Producer::element_name(), &producer.display_label()),
        );
    };

    let export_csv = move |_| {
        let filename = export_filename("produtores", &today_iso(), "csv");
        let rows = filtered.with_untracked(|items| query.with_untracked(|q| filtered_sorted(items, q)));
        let result = export_to_csv(&rows, &filename);
        set_export_error.set(result.err().map(|e| e.to_string()));
    };

    let sort_header = move |field: &'static str, label: &'static str| {
        view! {
            <TableHeaderCell>
                <div
                    class=move || query.with(|q| get_sort_class(&q.sort_field, field))
                    on:click=move |_| query.update(|q| q.toggle_sort(field))
                >
                    {label}
                    <span>{move || query.with(|q| get_sort_indicator(&q.sort_field, field, q.sort_ascending))}</span>
                </div>
            </TableHeaderCell>
        }
    };

    let reload = load_data.clone();

    view! {
        <PageFrame page_id="a001_producer--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{Producer::list_name()}</h1>
                    <Badge>{move || page.with(|p| p.total_count.to_string())}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| tabs_store.open_tab("a001_producer_new", "Novo produtor")
                    >
                        {icon("plus")}
                        " Novo"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=export_csv>
                        {icon("download")}
                        " CSV"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload()
                        disabled=Signal::derive(move || load_state.with(LoadState::is_loading))
                    >
                        {icon("refresh")}
                        {move || if load_state.with(LoadState::is_loading) { " Carregando..." } else { " Atualizar" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || load_state.with(|s| s.error().map(|e| view! { <div class="alert alert--error">{e.to_string()}</div> }))}
                {move || export_error.get().map(|e| view! { <div class="alert alert--warning">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            <SearchInput
                                value=Signal::derive(move || query.with(|q| q.search.clone()))
                                on_change=Callback::new(move |text: String| query.update(|q| {
                                    q.search = text;
                                    q.page = 0;
                                }))
                                placeholder="Código, nome, CPF, município..."
                            />
                            <select
                                class="filter-panel__select"
                                prop:value=move || status_filter.get()
                                on:change=move |ev| {
                                    status_filter.set(event_target_value(&ev));
                                    query.update(|q| q.page = 0);
                                }
                            >
                                <option value="">"Todas as situações"</option>
                                {ProducerStatus::ALL
                                    .iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || page.with(|p| p.page))
                                total_pages=Signal::derive(move || page.with(|p| p.total_pages))
                                total_count=Signal::derive(move || page.with(|p| p.total_count))
                                page_size=Signal::derive(move || query.with(|q| q.page_size))
                                on_page_change=Callback::new(move |p| query.update(|q| q.page = p))
                                on_page_size_change=Callback::new(move |size| query.update(|q| {
                                    q.page_size = size;
                                    q.page = 0;
                                }))
                            />
                        </div>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                {sort_header("code", "Código")}
                                {sort_header("name", "Nome")}
                                {sort_header("cpf", "CPF")}
                                {sort_header("municipality", "Município")}
                                {sort_header("community", "Comunidade")}
                                {sort_header("status", "Situação")}
                                {sort_header("hive_count", "Colmeias")}
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || page.get().items
                                key=|p| (p.id, p.name.clone(), p.status, p.municipality.clone())
                                children=move |producer| {
                                    let search = move || query.with(|q| q.search.clone());
                                    let for_open = producer.clone();
                                    let name = producer.name.clone();
                                    let code = producer.code.clone();
                                    view! {
                                        <TableRow
                                            class="table__row--clickable"
                                            on:click=move |_| open_details(&for_open)
                                        >
                                            <TableCell>
                                                <TableCellLayout>
                                                    {move || highlight_matches(&code, &search())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span class="table__cell--strong">
                                                        {move || highlight_matches(&name, &search())}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{producer.cpf.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{producer.municipality.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {producer.community.clone().unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=status_badge(producer.status)>{producer.status.label()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--number">
                                                <TableCellLayout>
                                                    {producer.hive_count.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn producer(id: i64, code: &str, name: &str, status: &str, hives: Option<u32>) -> Producer {
        serde_json::from_value(json!({
            "id": id,
            "codigo": code,
            "nome": name,
            "cpf": "529.982.247-25",
            "municipio": "Picos",
            "comunidade": "Baixa Grande",
            "status": status,
            "num_colmeias": hives
        }))
        .unwrap()
    }

    #[test]
    fn test_search_covers_code_and_community() {
        let p = producer(1, "P001", "Maria Souza", "ativo", Some(4));
        assert!(p.matches_filter("p00"));
        assert!(p.matches_filter("baixa"));
        assert!(!p.matches_filter("oeiras"));
    }

    #[test]
    fn test_sort_by_hive_count_puts_unknown_first() {
        let a = producer(1, "P001", "Ana", "ativo", Some(10));
        let b = producer(2, "P002", "Bia", "ativo", None);
        assert_eq!(a.compare_by_field(&b, "hive_count"), Ordering::Greater);
        assert_eq!(a.compare_by_field(&b, "name"), Ordering::Less);
    }

    #[test]
    fn test_status_filter() {
        let p = producer(1, "P001", "Ana", "suspenso", None);
        assert!(status_matches(&p, ""));
        assert!(status_matches(&p, "suspenso"));
        assert!(!status_matches(&p, "ativo"));
    }

    #[test]
    fn test_csv_row_matches_headers() {
        let p = producer(1, "P001", "Ana", "ativo", Some(3));
        let row = p.to_csv_row();
        assert_eq!(row.len(), Producer::headers().len());
        assert_eq!(row[5], "Ativo");
        assert_eq!(row[7], "3");
    }
}
