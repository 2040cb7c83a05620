use super::filter::{ReferenceSet, ReportFilter};
use crate::domain::a002_entry::Entry;
use crate::domain::a004_color::{aggregate::FALLBACK_HEX, Color};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Grouping dimension of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    Period,
    Municipality,
    Community,
    Producer,
    Color,
}

impl ReportType {
    pub const ALL: [ReportType; 5] = [
        ReportType::Period,
        ReportType::Municipality,
        ReportType::Community,
        ReportType::Producer,
        ReportType::Color,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ReportType::Period => "period",
            ReportType::Municipality => "municipality",
            ReportType::Community => "community",
            ReportType::Producer => "producer",
            ReportType::Color => "color",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Selector label
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::Period => "Por período",
            ReportType::Municipality => "Por município",
            ReportType::Community => "Por comunidade",
            ReportType::Producer => "Por produtor",
            ReportType::Color => "Por cor",
        }
    }

    /// Table and document title
    pub fn title(&self) -> &'static str {
        match self {
            ReportType::Period => "Produção por Período",
            ReportType::Municipality => "Produção por Município",
            ReportType::Community => "Produção por Comunidade",
            ReportType::Producer => "Produção por Produtor",
            ReportType::Color => "Produção por Cor",
        }
    }
}

const MONTHS_PT_BR: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// `"Jan/2024"`
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTHS_PT_BR
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{}/{}", name, year)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    /// (year, month)
    pub key: (i32, u32),
    pub label: String,
    pub production: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRow {
    pub name: String,
    pub production: f64,
    /// Distinct producer codes in the bucket
    pub producer_count: usize,
    /// `production / producer_count`, NaN when the count is zero
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerRow {
    pub name: String,
    /// Municipality of the first entry seen for this producer
    pub municipality: String,
    pub production: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRow {
    pub code: i32,
    pub name: String,
    pub hex: String,
    pub production: f64,
    /// Share of the filtered total, 0..=100
    pub percentage: f64,
}

/// Grouped report rows, one variant per [`ReportType`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportRows {
    Period(Vec<PeriodRow>),
    Municipality(Vec<LocationRow>),
    Community(Vec<LocationRow>),
    Producer(Vec<ProducerRow>),
    Color(Vec<ColorRow>),
}

/// One bar of the report chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub color: Option<String>,
}

impl ReportRows {
    pub fn report_type(&self) -> ReportType {
        match self {
            ReportRows::Period(_) => ReportType::Period,
            ReportRows::Municipality(_) => ReportType::Municipality,
            ReportRows::Community(_) => ReportType::Community,
            ReportRows::Producer(_) => ReportType::Producer,
            ReportRows::Color(_) => ReportType::Color,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportRows::Period(r) => r.len(),
            ReportRows::Municipality(r) | ReportRows::Community(r) => r.len(),
            ReportRows::Producer(r) => r.len(),
            ReportRows::Color(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Production per bucket, in row order
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        match self {
            ReportRows::Period(rows) => rows
                .iter()
                .map(|r| ChartPoint {
                    label: r.label.clone(),
                    value: r.production,
                    color: None,
                })
                .collect(),
            ReportRows::Municipality(rows) | ReportRows::Community(rows) => rows
                .iter()
                .map(|r| ChartPoint {
                    label: r.name.clone(),
                    value: r.production,
                    color: None,
                })
                .collect(),
            ReportRows::Producer(rows) => rows
                .iter()
                .map(|r| ChartPoint {
                    label: r.name.clone(),
                    value: r.production,
                    color: None,
                })
                .collect(),
            ReportRows::Color(rows) => rows
                .iter()
                .map(|r| ChartPoint {
                    label: r.name.clone(),
                    value: r.production,
                    color: Some(r.hex.clone()),
                })
                .collect(),
        }
    }
}

/// Filter `entries` and group them into `report_type`
pub fn build_report(
    entries: &[Entry],
    filter: &ReportFilter,
    refs: ReferenceSet<'_>,
    report_type: ReportType,
) -> ReportRows {
    let filtered = filter.apply(entries, refs);
    group(&filtered, refs.colors, report_type)
}

/// Group an already filtered set
pub fn group(entries: &[Entry], colors: &[Color], report_type: ReportType) -> ReportRows {
    match report_type {
        ReportType::Period => ReportRows::Period(group_by_period(entries)),
        ReportType::Municipality => ReportRows::Municipality(group_by_location(entries, |e| {
            Some(e.municipality.as_str())
        })),
        ReportType::Community => {
            ReportRows::Community(group_by_location(entries, Entry::community_name))
        }
        ReportType::Producer => ReportRows::Producer(group_by_producer(entries)),
        ReportType::Color => ReportRows::Color(group_by_color(entries, colors)),
    }
}

fn by_production_then_name(
    a_production: f64,
    a_name: &str,
    b_production: f64,
    b_name: &str,
) -> Ordering {
    b_production
        .total_cmp(&a_production)
        .then_with(|| a_name.cmp(b_name))
}

/// Month buckets in chronological order; entries without a parseable date are skipped
pub fn group_by_period(entries: &[Entry]) -> Vec<PeriodRow> {
    let mut buckets: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for entry in entries {
        let Some(date) = entry.parsed_date() else {
            continue;
        };
        let bucket = buckets.entry((date.year(), date.month())).or_default();
        bucket.0 += entry.net_weight;
        bucket.1 += entry.total_value;
    }
    buckets
        .into_iter()
        .map(|((year, month), (production, total_value))| PeriodRow {
            key: (year, month),
            label: month_label(year, month),
            production,
            total_value,
        })
        .collect()
}

/// Buckets by the literal location value; entries where `location` is `None` are left out
pub fn group_by_location<'e, F>(entries: &'e [Entry], location: F) -> Vec<LocationRow>
where
    F: Fn(&'e Entry) -> Option<&'e str>,
{
    let mut buckets: HashMap<&str, (f64, HashSet<&str>)> = HashMap::new();
    for entry in entries {
        let Some(name) = location(entry) else {
            continue;
        };
        let bucket = buckets.entry(name).or_default();
        bucket.0 += entry.net_weight;
        bucket.1.insert(entry.producer_id.as_str());
    }
    let mut rows: Vec<LocationRow> = buckets
        .into_iter()
        .map(|(name, (production, producers))| {
            let producer_count = producers.len();
            LocationRow {
                name: name.to_string(),
                production,
                producer_count,
                average: production / producer_count as f64,
            }
        })
        .collect();
    rows.sort_by(|a, b| by_production_then_name(a.production, &a.name, b.production, &b.name));
    rows
}

/// Buckets by producer name
pub fn group_by_producer(entries: &[Entry]) -> Vec<ProducerRow> {
    let mut rows: Vec<ProducerRow> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        let i = *index.entry(entry.producer_name.as_str()).or_insert_with(|| {
            rows.push(ProducerRow {
                name: entry.producer_name.clone(),
                municipality: entry.municipality.clone(),
                production: 0.0,
                total_value: 0.0,
            });
            rows.len() - 1
        });
        rows[i].production += entry.net_weight;
        rows[i].total_value += entry.total_value;
    }
    rows.sort_by(|a, b| by_production_then_name(a.production, &a.name, b.production, &b.name));
    rows
}

/// Buckets by resolved color name, `"Cor {code}"` when the code is unknown
pub fn group_by_color(entries: &[Entry], colors: &[Color]) -> Vec<ColorRow> {
    let by_code: HashMap<i32, &Color> = colors.iter().map(|c| (c.code, c)).collect();
    let mut rows: Vec<ColorRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut grand_total = 0.0;

    for entry in entries {
        let color = by_code.get(&entry.color_code);
        let name = color
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Cor {}", entry.color_code));
        let i = match index.get(&name) {
            Some(&i) => i,
            None => {
                rows.push(ColorRow {
                    code: entry.color_code,
                    name: name.clone(),
                    hex: color
                        .map(|c| c.display_hex().to_string())
                        .unwrap_or_else(|| FALLBACK_HEX.to_string()),
                    production: 0.0,
                    percentage: 0.0,
                });
                index.insert(name, rows.len() - 1);
                rows.len() - 1
            }
        };
        rows[i].production += entry.net_weight;
        grand_total += entry.net_weight;
    }

    for row in &mut rows {
        row.percentage = if grand_total == 0.0 {
            0.0
        } else {
            row.production / grand_total * 100.0
        };
    }
    rows.sort_by(|a, b| by_production_then_name(a.production, &a.name, b.production, &b.name));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a003_municipality::Municipality;

    fn entry(date: &str, producer: &str, municipality: &str, net: f64) -> Entry {
        Entry {
            date: date.into(),
            producer_id: producer.into(),
            producer_name: format!("Produtor {}", producer),
            municipality: municipality.into(),
            net_weight: net,
            total_value: net * 10.0,
            ..Default::default()
        }
    }

    fn colors() -> Vec<Color> {
        vec![
            Color {
                code: 1,
                name: "Branco".into(),
                hex: "#ffffff".into(),
            },
            Color {
                code: 2,
                name: "Âmbar".into(),
                hex: "#cc8800".into(),
            },
        ]
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2024, 1), "Jan/2024");
        assert_eq!(month_label(2023, 9), "Set/2023");
        assert_eq!(month_label(2023, 12), "Dez/2023");
    }

    #[test]
    fn test_period_single_bucket() {
        let entries = vec![
            entry("2024-01-05", "P1", "Picos", 10.0),
            entry("2024-01-20", "P2", "Picos", 20.0),
        ];
        let rows = group_by_period(&entries);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Jan/2024");
        assert_eq!(rows[0].production, 30.0);
        assert_eq!(rows[0].total_value, 300.0);
    }

    #[test]
    fn test_period_chronological_and_skips_bad_dates() {
        let entries = vec![
            entry("2024-03-01", "P1", "Picos", 1.0),
            entry("2023-12-31", "P1", "Picos", 2.0),
            entry("sem data", "P1", "Picos", 100.0),
            entry("2024-01-01T08:00:00Z", "P1", "Picos", 3.0),
        ];
        let labels: Vec<String> = group_by_period(&entries)
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["Dez/2023", "Jan/2024", "Mar/2024"]);
    }

    #[test]
    fn test_municipality_scenario() {
        let entries = vec![
            entry("2024-01-01", "P1", "São Paulo", 10.0),
            entry("2024-01-02", "P2", "São Paulo", 20.0),
            entry("2024-01-03", "P1", "Rio", 5.0),
        ];
        let municipalities: Vec<Municipality> = vec![];
        let colors = colors();
        let filter = ReportFilter {
            municipality: Some("São Paulo".into()),
            ..Default::default()
        };
        let rows = build_report(
            &entries,
            &filter,
            ReferenceSet::new(&municipalities, &colors),
            ReportType::Municipality,
        );
        let ReportRows::Municipality(rows) = rows else {
            panic!("wrong shape");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "São Paulo");
        assert_eq!(rows[0].producer_count, 2);
        assert_eq!(rows[0].production, 30.0);
        assert_eq!(rows[0].average, 15.0);
    }

    #[test]
    fn test_location_sorted_by_production_then_name() {
        let entries = vec![
            entry("2024-01-01", "P1", "B", 10.0),
            entry("2024-01-01", "P1", "A", 10.0),
            entry("2024-01-01", "P1", "C", 50.0),
        ];
        let names: Vec<String> = group_by_location(&entries, |e| Some(e.municipality.as_str()))
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_community_excludes_missing() {
        let mut a = entry("2024-01-01", "P1", "Picos", 10.0);
        a.community = Some("Sítio".into());
        let mut b = entry("2024-01-01", "P2", "Picos", 20.0);
        b.community = Some(" ".into());
        let c = entry("2024-01-01", "P3", "Picos", 30.0);
        let ReportRows::Community(rows) = group(&[a, b, c], &[], ReportType::Community) else {
            panic!("wrong shape");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Sítio");
        assert_eq!(rows[0].production, 10.0);
    }

    #[test]
    fn test_producer_keeps_first_municipality() {
        let entries = vec![
            entry("2024-01-01", "P1", "Picos", 10.0),
            entry("2024-01-02", "P1", "Oeiras", 15.0),
            entry("2024-01-02", "P2", "Oeiras", 40.0),
        ];
        let rows = group_by_producer(&entries);
        assert_eq!(rows[0].name, "Produtor P2");
        assert_eq!(rows[1].name, "Produtor P1");
        assert_eq!(rows[1].municipality, "Picos");
        assert_eq!(rows[1].production, 25.0);
        assert_eq!(rows[1].total_value, 250.0);
    }

    #[test]
    fn test_color_percentages_sum_to_hundred() {
        let mut entries = Vec::new();
        for (i, net) in [3.0, 7.0, 11.0, 0.5, 13.25].iter().enumerate() {
            let mut e = entry("2024-01-01", "P1", "Picos", *net);
            e.color_code = (i % 3) as i32;
            entries.push(e);
        }
        let rows = group_by_color(&entries, &colors());
        let sum: f64 = rows.iter().map(|r| r.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!(rows.iter().any(|r| r.name == "Cor 0" && r.hex == FALLBACK_HEX));
        assert!(rows.iter().any(|r| r.name == "Âmbar" && r.hex == "#cc8800"));
    }

    #[test]
    fn test_color_zero_total_has_zero_percentage() {
        let entries = vec![entry("2024-01-01", "P1", "Picos", 0.0)];
        let rows = group_by_color(&entries, &colors());
        assert_eq!(rows[0].percentage, 0.0);
    }

    #[test]
    fn test_empty_color_filter_gives_empty_rows() {
        let entries = vec![entry("2024-01-01", "P1", "Picos", 10.0)];
        let municipalities: Vec<Municipality> = vec![];
        let colors = colors();
        let filter = ReportFilter {
            color_name: Some("Âmbar".into()),
            ..Default::default()
        };
        let rows = build_report(
            &entries,
            &filter,
            ReferenceSet::new(&municipalities, &colors),
            ReportType::Color,
        );
        assert!(rows.is_empty());
        assert_eq!(rows, ReportRows::Color(vec![]));
        assert_eq!(super::super::EMPTY_REPORT_MESSAGE, "Nenhum dado disponível");
    }

    #[test]
    fn test_report_type_keys() {
        for t in ReportType::ALL {
            assert_eq!(ReportType::from_key(t.key()), Some(t));
        }
        assert_eq!(ReportType::from_key("x"), None);
    }
}
