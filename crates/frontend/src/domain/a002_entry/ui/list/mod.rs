mod edit_modal;
mod state;

use contracts::dashboards::d400_production_report::{ReferenceSet, ReportFilter, ReportSummary};
use contracts::domain::a002_entry::Entry;
use contracts::domain::a004_color::aggregate::find_by_code;
use contracts::domain::a004_color::Color;
use contracts::domain::common::AggregateRoot;
use contracts::shared::format::{format_date_br, format_decimal, format_money, format_weight};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::date_range_picker::DateRangePicker;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table_totals_row::TableTotalsRow;
use crate::shared::data::{use_repository, ReferenceData};
use crate::shared::date_utils::today_iso;
use crate::shared::export::{export_filename, export_to_csv, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    any_field_contains, filtered_sorted, get_sort_class, get_sort_indicator, visible_page,
    SearchInput, Searchable, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::state::{use_shared_tables, LoadState, LoadStateSignal};
use edit_modal::EditEntryModal;
use state::create_state;

impl Searchable for Entry {
    fn matches_filter(&self, filter: &str) -> bool {
        any_field_contains(
            &[
                self.producer_id.as_str(),
                self.producer_name.as_str(),
                self.municipality.as_str(),
                self.community.as_deref().unwrap_or(""),
                self.lot.as_deref().unwrap_or(""),
                self.invoice_number.as_deref().unwrap_or(""),
            ],
            filter,
        )
    }
}

impl Sortable for Entry {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "producer_name" => self
                .producer_name
                .to_lowercase()
                .cmp(&other.producer_name.to_lowercase()),
            "municipality" => self.municipality.cmp(&other.municipality),
            "net_weight" => self.net_weight.total_cmp(&other.net_weight),
            "unit_value" => self.unit_value.total_cmp(&other.unit_value),
            "total_value" => self.total_value.total_cmp(&other.total_value),
            "color_code" => self.color_code.cmp(&other.color_code),
            "humidity" => self.humidity.total_cmp(&other.humidity),
            // ISO text sorts chronologically; ties keep insertion order by id
            _ => self.date.cmp(&other.date).then(self.id.cmp(&other.id)),
        }
    }
}

impl CsvExportable for Entry {
    fn headers() -> Vec<&'static str> {
        vec![
            "Data",
            "Código produtor",
            "Produtor",
            "Município",
            "Comunidade",
            "Peso bruto (kg)",
            "Tara (kg)",
            "Peso líquido (kg)",
            "Valor unitário",
            "Valor total",
            "Cor",
            "Umidade (%)",
            "Lote",
            "Nota fiscal",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            format_date_br(&self.date),
            self.producer_id.clone(),
            self.producer_name.clone(),
            self.municipality.clone(),
            self.community.clone().unwrap_or_default(),
            format_decimal(self.gross_weight, 2),
            format_decimal(self.tare, 2),
            format_decimal(self.net_weight, 2),
            format_decimal(self.unit_value, 2),
            format_decimal(self.total_value, 2),
            self.color_code.to_string(),
            format_decimal(self.humidity, 1),
            self.lot.clone().unwrap_or_default(),
            self.invoice_number.clone().unwrap_or_default(),
        ]
    }
}

/// Entries delivered inside the inclusive range; a half-open range keeps everything
fn in_date_range(entries: &[Entry], date_from: &str, date_to: &str) -> Vec<Entry> {
    let filter = ReportFilter {
        date_from: Some(date_from.to_string()),
        date_to: Some(date_to.to_string()),
        ..Default::default()
    };
    filter.apply(entries, ReferenceSet::new(&[], &[]))
}

fn color_name(colors: &[Color], code: i32) -> String {
    find_by_code(colors, code)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("Cor {}", code))
}

#[component]
pub fn EntryList() -> impl IntoView {
    let repo = use_repository();
    let tables = use_shared_tables();
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let state = create_state();
    let reference = RwSignal::new(ReferenceData::default());
    let load_state = RwSignal::new(LoadState::Idle);
    let editing: RwSignal<Option<Entry>> = RwSignal::new(None);
    let (export_error, set_export_error) = signal::<Option<String>>(None);

    let load_data = move || {
        if !load_state.try_begin() {
            return;
        }
        let repo = repo.clone();
        spawn_local(async move {
            let (entries, lookups) =
                futures::join!(repo.fetch_entries(), ReferenceData::load(repo.as_ref()));
            match (entries, lookups) {
                (Ok(entries), Ok(lookups)) => {
                    tables.entries.set(entries);
                    reference.set(lookups);
                    load_state.succeed();
                }
                (Err(e), _) | (_, Err(e)) => {
                    load_state.fail(format!("Não foi possível carregar as entradas: {}", e))
                }
            }
        });
    };
    load_data();

    let in_range = Memo::new(move |_| {
        let (from, to) = state.with(|s| (s.date_from.clone(), s.date_to.clone()));
        tables.entries.with(|all| in_date_range(all, &from, &to))
    });
    let matching = Memo::new(move |_| in_range.with(|items| state.with(|s| filtered_sorted(items, &s.query))));
    let page = Memo::new(move |_| in_range.with(|items| state.with(|s| visible_page(items, &s.query))));
    let summary = Memo::new(move |_| matching.with(|items| ReportSummary::from_entries(items)));

    let export_csv = move |_| {
        let filename = export_filename("entradas", &today_iso(), "csv");
        let result = matching.with_untracked(|rows| export_to_csv(rows, &filename));
        set_export_error.set(result.err().map(|e| e.to_string()));
    };

    let sort_header = move |field: &'static str, label: &'static str| {
        view! {
            <TableHeaderCell>
                <div
                    class=move || state.with(|s| get_sort_class(&s.query.sort_field, field))
                    on:click=move |_| state.update(|s| s.query.toggle_sort(field))
                >
                    {label}
                    <span>
                        {move || state.with(|s| get_sort_indicator(&s.query.sort_field, field, s.query.sort_ascending))}
                    </span>
                </div>
            </TableHeaderCell>
        }
    };

    let reload = load_data.clone();

    view! {
        <PageFrame page_id="a002_entry--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{Entry::list_name()}</h1>
                    <Badge>{move || page.with(|p| p.total_count.to_string())}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| tabs_store.open_tab("a002_entry_new", "Registrar entrada")
                    >
                        {icon("plus")}
                        " Registrar"
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
                            <DateRangePicker
                                date_from=Signal::derive(move || state.with(|s| s.date_from.clone()))
                                date_to=Signal::derive(move || state.with(|s| s.date_to.clone()))
                                on_change=Callback::new(move |(from, to): (String, String)| state.update(|s| {
                                    s.date_from = from;
                                    s.date_to = to;
                                    s.query.page = 0;
                                }))
                            />
                            <SearchInput
                                value=Signal::derive(move || state.with(|s| s.query.search.clone()))
                                on_change=Callback::new(move |text: String| state.update(|s| {
                                    s.query.search = text;
                                    s.query.page = 0;
                                }))
                                placeholder="Produtor, município, lote, nota..."
                            />
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || page.with(|p| p.page))
                                total_pages=Signal::derive(move || page.with(|p| p.total_pages))
                                total_count=Signal::derive(move || page.with(|p| p.total_count))
                                page_size=Signal::derive(move || state.with(|s| s.query.page_size))
                                on_page_change=Callback::new(move |p| state.update(|s| s.query.page = p))
                                on_page_size_change=Callback::new(move |size| state.update(|s| {
                                    s.query.page_size = size;
                                    s.query.page = 0;
                                }))
                            />
                        </div>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                {sort_header("date", "Data")}
                                {sort_header("producer_name", "Produtor")}
                                {sort_header("municipality", "Município")}
                                {sort_header("net_weight", "Peso líquido")}
                                {sort_header("unit_value", "Valor unit.")}
                                {sort_header("total_value", "Valor total")}
                                {sort_header("color_code", "Cor")}
                                {sort_header("humidity", "Umidade")}
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || page.get().items
                                key=|e| (e.id, e.date.clone(), e.net_weight.to_bits(), e.total_value.to_bits(), e.color_code)
                                children=move |entry| {
                                    let for_edit = entry.clone();
                                    let color = reference.with_untracked(|r| color_name(&r.colors, entry.color_code));
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>{format_date_br(&entry.date)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span class="table__cell--strong">{entry.producer_name.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{entry.municipality.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--number">
                                                <TableCellLayout>{format_weight(entry.net_weight)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--number">
                                                <TableCellLayout>{format_money(entry.unit_value)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--number">
                                                <TableCellLayout>{format_money(entry.total_value)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{color}</TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--number">
                                                <TableCellLayout>{format!("{}%", format_decimal(entry.humidity, 1))}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| editing.set(Some(for_edit.clone()))
                                                    attr:title="Editar"
                                                >
                                                    {icon("edit")}
                                                </Button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                            <TableTotalsRow>
                                <td colspan="3">
                                    {move || summary.with(|s| format!("Total ({} entradas)", s.entry_count))}
                                </td>
                                <td class="table__cell--number">{move || summary.with(|s| format_weight(s.total_production))}</td>
                                <td class="table__cell--number">{move || summary.with(|s| format_money(s.average_unit_price))}</td>
                                <td class="table__cell--number">{move || summary.with(|s| format_money(s.total_value))}</td>
                                <td colspan="3"></td>
                            </TableTotalsRow>
                        </TableBody>
                    </Table>
                </div>

                {move || editing.get().map(|entry| view! {
                    <EditEntryModal
                        entry=entry
                        reference=reference
                        on_close=Callback::new(move |_| editing.set(None))
                        on_saved=Callback::new(move |entries: Vec<Entry>| {
                            tables.entries.set(entries);
                            editing.set(None);
                        })
                    />
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: i64, date: &str, net: f64) -> Entry {
        serde_json::from_value(json!({
            "id": id,
            "data": date,
            "produtor_id": "P001",
            "produtor_nome": "Maria Souza",
            "municipio": "Picos",
            "peso_liquido": net,
            "valor_unitario": 10.0,
            "cor_codigo": 2
        }))
        .unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let entries = vec![
            entry(1, "2024-01-01", 10.0),
            entry(2, "2024-01-31", 20.0),
            entry(3, "2024-02-01", 30.0),
            entry(4, "sem data", 40.0),
        ];
        let ids: Vec<i64> = in_date_range(&entries, "2024-01-01", "2024-01-31")
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(in_date_range(&entries, "", "").len(), 4);
        assert_eq!(in_date_range(&entries, "2024-01-01", "").len(), 4);
    }

    #[test]
    fn test_default_sort_is_by_date() {
        let a = entry(1, "2024-01-05", 10.0);
        let b = entry(2, "2024-01-04", 10.0);
        assert_eq!(a.compare_by_field(&b, "date"), Ordering::Greater);
        assert_eq!(a.compare_by_field(&b, "unknown"), Ordering::Greater);
        assert_eq!(a.compare_by_field(&b, "net_weight"), Ordering::Equal);
    }

    #[test]
    fn test_color_name_fallback() {
        let colors = vec![Color {
            code: 2,
            name: "Âmbar claro".into(),
            hex: String::new(),
        }];
        assert_eq!(color_name(&colors, 2), "Âmbar claro");
        assert_eq!(color_name(&colors, 7), "Cor 7");
    }

    #[test]
    fn test_csv_row_matches_headers() {
        let e = entry(1, "2024-01-05", 12.5);
        let row = e.to_csv_row();
        assert_eq!(row.len(), Entry::headers().len());
        assert_eq!(row[0], "05/01/2024");
        assert_eq!(row[7], "12,50");
    }
}
