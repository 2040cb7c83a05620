use super::super::state::{compute_report, create_state, ReportOutput};
use super::filter_panel::ReportFilterPanel;
use crate::shared::components::bar_chart::BarChart;
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::table_totals_row::TableTotalsRow;
use crate::shared::data::{use_repository, ReferenceData};
use crate::shared::date_utils::today_iso;
use crate::shared::export::{
    export_filename, export_pdf, export_workbook, ExportError, WorkbookSources,
};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::state::{use_shared_tables, LoadState, LoadStateSignal};
use contracts::dashboards::d400_production_report::{ReportCell, EMPTY_REPORT_MESSAGE};
use contracts::domain::a004_color::Color;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn cell_class(cell: &ReportCell) -> &'static str {
    if cell.is_numeric() {
        "table__cell--number"
    } else {
        ""
    }
}

/// `(class, text)` per cell, owned so the rows can move into the table views
fn rendered_cells(cells: &[ReportCell]) -> Vec<(&'static str, String)> {
    cells.iter().map(|c| (cell_class(c), c.display())).collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Xlsx,
    Pdf,
}

fn export(
    output: &ReportOutput,
    colors: &[Color],
    stem: &str,
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Xlsx => {
            let sources = WorkbookSources {
                producers: &output.producers,
                entries: &output.entries,
                colors,
            };
            export_workbook(&output.table, &sources, &export_filename(stem, &today_iso(), "xlsx"))
        }
        ExportFormat::Pdf => {
            let generated_at = chrono::Local::now().format("%d/%m/%Y %H:%M").to_string();
            export_pdf(&output.table, &generated_at, &export_filename(stem, &today_iso(), "pdf"))
        }
    }
}

#[component]
pub fn ProductionReportPage() -> impl IntoView {
    let repo = use_repository();
    let tables = use_shared_tables();
    let state = create_state();
    let reference = RwSignal::new(ReferenceData::default());
    let load_state = RwSignal::new(LoadState::Idle);
    let export_error = RwSignal::new(None::<String>);

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
                    tables.producers.set(lookups.producers.clone());
                    tables.entries.set(entries);
                    reference.set(lookups);
                    load_state.succeed();
                }
                (Err(e), _) | (_, Err(e)) => {
                    log::error!("report load failed: {}", e);
                    load_state.fail(format!("Não foi possível carregar os dados: {}", e));
                }
            }
        });
    };
    load_data();

    // producers edited in another tab show up here without a reload
    Effect::new(move |_| {
        let producers = tables.producers.get();
        reference.update(|r| r.producers = producers);
    });

    let output = Memo::new(move |_| {
        let selection = state.get();
        tables.entries.with(|entries| {
            reference.with(|r| compute_report(selection.kind, &selection.filter, entries, r))
        })
    });

    let on_export = move |format: ExportFormat| {
        let stem = state.with_untracked(|s| s.kind.file_stem());
        let result = output.with_untracked(|o| {
            reference.with_untracked(|r| export(o, &r.colors, &stem, format))
        });
        match result {
            Ok(()) => export_error.set(None),
            Err(e) => {
                log::warn!("report export failed: {}", e);
                export_error.set(Some(e.to_string()));
            }
        }
    };

    let is_empty = Signal::derive(move || output.with(|o| o.table.is_empty()));
    let chart_points = Signal::derive(move || output.with(|o| o.chart.clone()));
    let reload = load_data.clone();

    view! {
        <PageFrame page_id="d400_production_report--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader title="Relatórios" subtitle="Produção de mel por período, local, produtor e cor">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_export(ExportFormat::Xlsx)
                    disabled=is_empty
                >
                    {icon("file-xlsx")}
                    " Excel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_export(ExportFormat::Pdf)
                    disabled=is_empty
                >
                    {icon("file-pdf")}
                    " PDF"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| reload()
                    disabled=Signal::derive(move || load_state.with(LoadState::is_loading))
                >
                    {icon("refresh")}
                    " Atualizar"
                </Button>
            </PageHeader>

            <div class="page__content">
                {move || load_state.with(|s| s.error().map(|e| view! { <div class="alert alert--error">{e.to_string()}</div> }))}
                {move || export_error.get().map(|e| view! { <div class="alert alert--warning">{e}</div> })}

                <ReportFilterPanel state=state reference=reference />

                <Show
                    when=move || !is_empty.get()
                    fallback=move || view! {
                        <div class="placeholder">
                            {move || if load_state.with(LoadState::is_loading) { "Carregando..." } else { EMPTY_REPORT_MESSAGE }}
                        </div>
                    }
                >
                    {move || output.with(|o| {
                        (!o.table.filters.is_empty()).then(|| view! {
                            <div class="report__filters">{o.table.filters.join(" · ")}</div>
                        })
                    })}

                    <Show when=move || output.with(|o| !o.chart.is_empty())>
                        <div class="dashboard-card">
                            <BarChart points=chart_points />
                        </div>
                    </Show>

                    <div class="table-wrapper">
                        <h3 class="dashboard-card__title">{move || output.with(|o| o.table.title.clone())}</h3>
                        <Table attr:style="width: 100%;">
                            <TableHeader>
                                <TableRow>
                                    {move || {
                                        output
                                            .with(|o| o.table.headers.clone())
                                            .into_iter()
                                            .map(|h| view! { <TableHeaderCell>{h}</TableHeaderCell> })
                                            .collect_view()
                                    }}
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {move || {
                                    output
                                        .with(|o| {
                                            o.table
                                                .rows
                                                .iter()
                                                .map(|row| rendered_cells(row))
                                                .collect::<Vec<_>>()
                                        })
                                        .into_iter()
                                        .map(|cells| view! {
                                            <TableRow>
                                                {cells
                                                    .into_iter()
                                                    .map(|(class, text)| view! { <TableCell class=class>{text}</TableCell> })
                                                    .collect_view()}
                                            </TableRow>
                                        })
                                        .collect_view()
                                }}
                                {move || {
                                    output
                                        .with(|o| o.table.totals.as_deref().map(rendered_cells))
                                        .map(|cells| view! {
                                            <TableTotalsRow>
                                                {cells
                                                    .into_iter()
                                                    .map(|(class, text)| view! { <td class=class>{text}</td> })
                                                    .collect_view()}
                                            </TableTotalsRow>
                                        })
                                }}
                            </TableBody>
                        </Table>
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_cells_are_right_aligned() {
        assert_eq!(cell_class(&ReportCell::Weight(1.0)), "table__cell--number");
        assert_eq!(cell_class(&ReportCell::Count(3)), "table__cell--number");
        assert_eq!(cell_class(&ReportCell::text("Picos")), "");
        assert_eq!(cell_class(&ReportCell::Empty), "");
    }

    #[test]
    fn test_rendered_cells_are_owned_and_formatted() {
        let row = vec![
            ReportCell::text("Picos"),
            ReportCell::Count(3),
            ReportCell::Empty,
        ];
        let cells = rendered_cells(&row);
        drop(row);
        assert_eq!(
            cells,
            vec![
                ("", "Picos".to_string()),
                ("table__cell--number", "3".to_string()),
                ("", String::new()),
            ]
        );
    }
}
