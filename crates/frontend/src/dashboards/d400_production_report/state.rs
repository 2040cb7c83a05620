//! Report page selection and the pure computation behind it

use crate::shared::data::ReferenceData;
use crate::shared::state::persist;
use contracts::dashboards::d400_production_report::aggregation::{group, ChartPoint};
use contracts::dashboards::d400_production_report::table::{
    entry_list_table, producer_list_table,
};
use contracts::dashboards::d400_production_report::{
    ReferenceSet, ReportFilter, ReportTable, ReportType,
};
use contracts::domain::a001_producer::Producer;
use contracts::domain::a002_entry::Entry;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

const STORAGE_KEY: &str = "d400_production_report_state";

/// What the page shows: one of the grouped reports or a raw list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    Grouped(ReportType),
    ProducerList,
    EntryList,
}

impl Default for ReportKind {
    fn default() -> Self {
        ReportKind::Grouped(ReportType::Period)
    }
}

impl ReportKind {
    pub fn all() -> Vec<ReportKind> {
        let mut kinds: Vec<ReportKind> = ReportType::ALL
            .into_iter()
            .map(ReportKind::Grouped)
            .collect();
        kinds.push(ReportKind::ProducerList);
        kinds.push(ReportKind::EntryList);
        kinds
    }

    pub fn key(&self) -> &'static str {
        match self {
            ReportKind::Grouped(t) => t.key(),
            ReportKind::ProducerList => "producer_list",
            ReportKind::EntryList => "entry_list",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Grouped(t) => t.label(),
            ReportKind::ProducerList => "Relação de produtores",
            ReportKind::EntryList => "Relação de entradas",
        }
    }

    /// File name stem of the exports
    pub fn file_stem(&self) -> String {
        format!("relatorio_{}", self.key())
    }
}

/// Persisted selection of the report page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPageState {
    pub filter: ReportFilter,
    pub kind: ReportKind,
}

pub fn create_state() -> RwSignal<ReportPageState> {
    let state = RwSignal::new(persist::load(STORAGE_KEY).unwrap_or_default());
    Effect::new(move |_| state.with(|s| persist::save(STORAGE_KEY, s)));
    state
}

/// Rendered report plus the raw rows the workbook's auxiliary sheets need
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    pub table: ReportTable,
    /// Only grouped reports have a chart
    pub chart: Vec<ChartPoint>,
    pub producers: Vec<Producer>,
    pub entries: Vec<Entry>,
}

pub fn compute_report(
    kind: ReportKind,
    filter: &ReportFilter,
    entries: &[Entry],
    reference: &ReferenceData,
) -> ReportOutput {
    let refs = ReferenceSet::new(&reference.municipalities, &reference.colors);
    let filtered_entries = filter.apply(entries, refs);
    let mut filtered_producers: Vec<Producer> = reference
        .producers
        .iter()
        .filter(|p| filter.matches_producer(p, refs))
        .cloned()
        .collect();
    filtered_producers.sort_by(|a, b| a.name.cmp(&b.name));
    let described = filter.describe();

    let (table, chart) = match kind {
        ReportKind::Grouped(report_type) => {
            let rows = group(&filtered_entries, &reference.colors, report_type);
            (rows.to_table(described), rows.chart_points())
        }
        ReportKind::ProducerList => (
            producer_list_table(&filtered_producers, described),
            Vec::new(),
        ),
        ReportKind::EntryList => (
            entry_list_table(&filtered_entries, &reference.colors, described),
            Vec::new(),
        ),
    };

    ReportOutput {
        table,
        chart,
        producers: filtered_producers,
        entries: filtered_entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_municipality::Municipality;
    use contracts::domain::a004_color::Color;
    use serde_json::json;

    fn entry(producer: &str, municipality: &str, net: f64, color: i32) -> Entry {
        serde_json::from_value(json!({
            "id": 1,
            "data": "2024-01-15",
            "produtor_id": producer,
            "produtor_nome": producer,
            "municipio": municipality,
            "peso_liquido": net,
            "cor_codigo": color
        }))
        .unwrap()
    }

    fn producer(code: &str, municipality: &str) -> Producer {
        serde_json::from_value(json!({
            "id": 1,
            "codigo": code,
            "nome": code,
            "municipio": municipality
        }))
        .unwrap()
    }

    fn reference() -> ReferenceData {
        ReferenceData {
            producers: vec![
                producer("P2", "São Paulo"),
                producer("P1", "São Paulo"),
                producer("P3", "Rio"),
            ],
            municipalities: vec![
                Municipality {
                    id: 1,
                    name: "São Paulo".into(),
                    region: "Sudeste".into(),
                },
                Municipality {
                    id: 2,
                    name: "Rio".into(),
                    region: "Sudeste".into(),
                },
            ],
            colors: vec![Color {
                code: 1,
                name: "Âmbar".into(),
                hex: "#FFBF00".into(),
            }],
            communities: Vec::new(),
        }
    }

    fn entries() -> Vec<Entry> {
        vec![
            entry("P1", "São Paulo", 10.0, 1),
            entry("P2", "São Paulo", 20.0, 1),
            entry("P1", "Rio", 5.0, 2),
        ]
    }

    #[test]
    fn test_grouped_report_by_municipality() {
        let filter = ReportFilter {
            municipality: Some("São Paulo".into()),
            ..Default::default()
        };
        let out = compute_report(
            ReportKind::Grouped(ReportType::Municipality),
            &filter,
            &entries(),
            &reference(),
        );
        assert_eq!(out.table.rows.len(), 1);
        assert_eq!(out.chart.len(), 1);
        assert_eq!(out.chart[0].value, 30.0);
        assert_eq!(out.entries.len(), 2);
        assert_eq!(out.table.filters, vec!["Município: São Paulo".to_string()]);
    }

    #[test]
    fn test_list_kinds_have_no_chart() {
        let filter = ReportFilter::default();
        let out = compute_report(ReportKind::ProducerList, &filter, &entries(), &reference());
        assert!(out.chart.is_empty());
        assert_eq!(out.table.rows.len(), 3);
        let codes: Vec<&str> = out.producers.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["P1", "P2", "P3"]);

        let out = compute_report(ReportKind::EntryList, &filter, &entries(), &reference());
        assert_eq!(out.table.rows.len(), 3);
    }

    #[test]
    fn test_unknown_color_empties_report() {
        let filter = ReportFilter {
            color_name: Some("Branco".into()),
            ..Default::default()
        };
        let out = compute_report(
            ReportKind::Grouped(ReportType::Color),
            &filter,
            &entries(),
            &reference(),
        );
        assert!(out.table.is_empty());
        assert!(out.chart.is_empty());
    }

    #[test]
    fn test_kind_keys_are_unique() {
        let kinds = ReportKind::all();
        assert_eq!(kinds.len(), 7);
        let mut keys: Vec<&str> = kinds.iter().map(|k| k.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 7);
        assert_eq!(ReportKind::default().file_stem(), "relatorio_period");
    }
}
