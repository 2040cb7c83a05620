use crate::shared::components::bar_chart::BarChart;
use crate::shared::components::date_range_picker::DateRangePicker;
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::stat_card::StatCard;
use crate::shared::data::{use_repository, ReferenceData};
use crate::shared::date_utils::{iso_pair, last_twelve_months, today};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::state::{use_shared_tables, LoadState, LoadStateSignal};
use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d400_production_report::aggregation::{
    group, ChartPoint, PeriodRow, ProducerRow,
};
use contracts::dashboards::d400_production_report::{
    ReferenceSet, ReportFilter, ReportRows, ReportSummary, ReportType, EMPTY_REPORT_MESSAGE,
};
use contracts::domain::a002_entry::Entry;
use contracts::shared::format::{format_money, format_percent, format_weight};
use contracts::shared::indicators::{IndicatorStatus, ValueFormat};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const TOP_PRODUCERS: usize = 5;

/// Everything the overview shows, computed in one pass over the filtered entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    pub summary: ReportSummary,
    pub monthly: Vec<PeriodRow>,
    pub colors: Vec<ChartPoint>,
    pub top_producers: Vec<ProducerRow>,
}

impl Overview {
    pub fn build(entries: &[Entry], reference: &ReferenceData, date_from: &str, date_to: &str) -> Self {
        let filter = ReportFilter {
            date_from: Some(date_from.to_string()),
            date_to: Some(date_to.to_string()),
            ..Default::default()
        };
        let refs = ReferenceSet::new(&reference.municipalities, &reference.colors);
        let filtered = filter.apply(entries, refs);

        let monthly = match group(&filtered, &reference.colors, ReportType::Period) {
            ReportRows::Period(rows) => rows,
            _ => Vec::new(),
        };
        let colors = group(&filtered, &reference.colors, ReportType::Color).chart_points();
        let top_producers = match group(&filtered, &reference.colors, ReportType::Producer) {
            ReportRows::Producer(rows) => rows.into_iter().take(TOP_PRODUCERS).collect(),
            _ => Vec::new(),
        };

        Self {
            summary: ReportSummary::from_entries(&filtered),
            monthly,
            colors,
            top_producers,
        }
    }

    /// Production of the month containing `date` and of the month before it
    pub fn month_pair(&self, date: NaiveDate) -> (f64, f64) {
        let current = (date.year(), date.month());
        let previous = if date.month() == 1 {
            (date.year() - 1, 12)
        } else {
            (date.year(), date.month() - 1)
        };
        let production = |key: (i32, u32)| {
            self.monthly
                .iter()
                .find(|r| r.key == key)
                .map(|r| r.production)
                .unwrap_or(0.0)
        };
        (production(current), production(previous))
    }
}

/// Percent change against the previous month; `None` without a base to compare
pub fn month_change(current: f64, previous: f64) -> Option<f64> {
    (previous > 0.0).then(|| (current - previous) / previous * 100.0)
}

fn change_status(change: Option<f64>) -> IndicatorStatus {
    match change {
        Some(c) if c > 0.0 => IndicatorStatus::Good,
        Some(c) if c < 0.0 => IndicatorStatus::Bad,
        _ => IndicatorStatus::Neutral,
    }
}

#[component]
pub fn OverviewDashboard() -> impl IntoView {
    let repo = use_repository();
    let tables = use_shared_tables();
    let reference = RwSignal::new(ReferenceData::default());
    let load_state = RwSignal::new(LoadState::Idle);

    let (initial_from, initial_to) = iso_pair(last_twelve_months(today()));
    let date_from = RwSignal::new(initial_from);
    let date_to = RwSignal::new(initial_to);

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
                    log::error!("overview load failed: {}", e);
                    load_state.fail(format!("Não foi possível carregar o painel: {}", e));
                }
            }
        });
    };
    load_data();

    let overview = Memo::new(move |_| {
        let (from, to) = (date_from.get(), date_to.get());
        tables
            .entries
            .with(|entries| reference.with(|r| Overview::build(entries, r, &from, &to)))
    });

    let month_values = Memo::new(move |_| overview.with(|o| o.month_pair(today())));
    let change = Signal::derive(move || {
        let (current, previous) = month_values.get();
        month_change(current, previous)
    });
    let active_producers = Signal::derive(move || {
        tables.producers.with(|p| Some(p.iter().filter(|p| p.is_active()).count() as f64))
    });

    let monthly_points = Signal::derive(move || {
        overview.with(|o| {
            ReportRows::Period(o.monthly.clone()).chart_points()
        })
    });
    let color_points = Signal::derive(move || overview.with(|o| o.colors.clone()));
    let reload = load_data.clone();

    view! {
        <PageFrame page_id="d401_overview--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader title="Painel" subtitle="Visão geral da produção de mel">
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

                <div class="filter-panel">
                    <DateRangePicker
                        date_from=date_from
                        date_to=date_to
                        on_change=Callback::new(move |(from, to): (String, String)| {
                            date_from.set(from);
                            date_to.set(to);
                        })
                        label="Período"
                    />
                </div>

                <div class="stat-grid">
                    <StatCard
                        label="Produção no período"
                        icon_name="scale"
                        value=Signal::derive(move || overview.with(|o| Some(o.summary.total_production)))
                        format=ValueFormat::Weight
                    />
                    <StatCard
                        label="Valor total"
                        icon_name="money"
                        value=Signal::derive(move || overview.with(|o| Some(o.summary.total_value)))
                        format=ValueFormat::Money
                    />
                    <StatCard
                        label="Entradas"
                        icon_name="entries"
                        value=Signal::derive(move || overview.with(|o| Some(o.summary.entry_count as f64)))
                        format=ValueFormat::Integer
                        subtitle=Signal::derive(move || {
                            overview.with(|o| Some(format!("{} produtores entregaram", o.summary.producer_count)))
                        })
                    />
                    <StatCard
                        label="Preço médio (R$/kg)"
                        icon_name="droplet"
                        value=Signal::derive(move || {
                            overview.with(|o| (o.summary.total_production > 0.0).then_some(o.summary.average_unit_price))
                        })
                        format=ValueFormat::Money
                    />
                    <StatCard
                        label="Produção no mês atual"
                        icon_name="calendar"
                        value=Signal::derive(move || Some(month_values.get().0))
                        format=ValueFormat::Weight
                        status=Signal::derive(move || Some(change_status(change.get())))
                        subtitle=Signal::derive(move || {
                            change.get().map(|c| format!("{} em relação ao mês anterior", format_percent(c)))
                        })
                    />
                    <StatCard
                        label="Produtores ativos"
                        icon_name="producers"
                        value=active_producers
                        format=ValueFormat::Integer
                    />
                </div>

                <div class="dashboard-grid">
                    <div class="dashboard-card">
                        <Show
                            when=move || overview.with(|o| !o.monthly.is_empty())
                            fallback=|| view! { <div class="placeholder">{EMPTY_REPORT_MESSAGE}</div> }
                        >
                            <BarChart points=monthly_points title="Produção mensal" />
                        </Show>
                    </div>
                    <div class="dashboard-card">
                        <Show
                            when=move || overview.with(|o| !o.colors.is_empty())
                            fallback=|| view! { <div class="placeholder">{EMPTY_REPORT_MESSAGE}</div> }
                        >
                            <BarChart points=color_points title="Produção por cor" />
                        </Show>
                    </div>
                </div>

                <div class="dashboard-card">
                    <h3 class="dashboard-card__title">"Maiores produtores no período"</h3>
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Produtor"</TableHeaderCell>
                                <TableHeaderCell>"Município"</TableHeaderCell>
                                <TableHeaderCell>"Produção"</TableHeaderCell>
                                <TableHeaderCell>"Valor"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                overview
                                    .with(|o| o.top_producers.clone())
                                    .into_iter()
                                    .map(|row| view! {
                                        <TableRow>
                                            <TableCell>{row.name}</TableCell>
                                            <TableCell>{row.municipality}</TableCell>
                                            <TableCell class="table__cell--number">{format_weight(row.production)}</TableCell>
                                            <TableCell class="table__cell--number">{format_money(row.total_value)}</TableCell>
                                        </TableRow>
                                    })
                                    .collect_view()
                            }}
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

    fn entry(date: &str, producer: &str, net: f64, color: i32) -> Entry {
        serde_json::from_value(json!({
            "id": 1,
            "data": date,
            "produtor_id": producer,
            "produtor_nome": producer,
            "municipio": "Picos",
            "peso_liquido": net,
            "valor_unitario": 10.0,
            "valor_total": net * 10.0,
            "cor_codigo": color
        }))
        .unwrap()
    }

    fn entries() -> Vec<Entry> {
        vec![
            entry("2024-01-10", "P1", 10.0, 1),
            entry("2024-01-20", "P2", 20.0, 2),
            entry("2024-02-05", "P1", 40.0, 1),
            entry("2023-06-01", "P3", 99.0, 1),
        ]
    }

    #[test]
    fn test_overview_respects_period() {
        let o = Overview::build(&entries(), &ReferenceData::default(), "2024-01-01", "2024-02-29");
        assert_eq!(o.summary.total_production, 70.0);
        assert_eq!(o.summary.producer_count, 2);
        assert_eq!(o.monthly.len(), 2);
        assert_eq!(o.monthly[0].label, "Jan/2024");
        assert_eq!(o.top_producers[0].name, "P1");
        assert_eq!(o.top_producers[0].production, 50.0);
        assert_eq!(o.colors.len(), 2);
    }

    #[test]
    fn test_month_pair_wraps_year() {
        let o = Overview::build(&entries(), &ReferenceData::default(), "", "");
        let feb = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        assert_eq!(o.month_pair(feb), (40.0, 30.0));
        let jan = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(o.month_pair(jan), (30.0, 0.0));
    }

    #[test]
    fn test_month_change() {
        assert_eq!(month_change(40.0, 30.0).map(|c| c.round()), Some(33.0));
        assert_eq!(month_change(10.0, 0.0), None);
        assert_eq!(change_status(Some(-5.0)), IndicatorStatus::Bad);
        assert_eq!(change_status(None), IndicatorStatus::Neutral);
    }
}
