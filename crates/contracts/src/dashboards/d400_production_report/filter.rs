use crate::domain::a001_producer::Producer;
use crate::domain::a002_entry::Entry;
use crate::domain::a003_municipality::Municipality;
use crate::domain::a004_color::{aggregate::code_for_name, Color};
use crate::domain::common::lenient::parse_iso_date;
use crate::shared::format::format_date_br;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference tables the filter joins against
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSet<'a> {
    pub municipalities: &'a [Municipality],
    pub colors: &'a [Color],
}

impl<'a> ReferenceSet<'a> {
    pub fn new(municipalities: &'a [Municipality], colors: &'a [Color]) -> Self {
        Self {
            municipalities,
            colors,
        }
    }
}

/// User-selected report filter. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// ISO date, inclusive
    pub date_from: Option<String>,
    /// ISO date, inclusive
    pub date_to: Option<String>,
    pub municipality: Option<String>,
    pub region: Option<String>,
    /// Cooperative code of the producer
    pub producer: Option<String>,
    pub color_name: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl ReportFilter {
    /// Inclusive date range, only when both bounds are set and parse
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let from = parse_iso_date(active(&self.date_from)?)?;
        let to = parse_iso_date(active(&self.date_to)?)?;
        Some((from, to))
    }

    pub fn is_empty(&self) -> bool {
        self.date_range().is_none()
            && active(&self.municipality).is_none()
            && active(&self.region).is_none()
            && active(&self.producer).is_none()
            && active(&self.color_name).is_none()
    }

    /// Resolve the joins once for a whole pass over the entries
    pub fn matcher<'a>(&'a self, refs: ReferenceSet<'a>) -> EntryMatcher<'a> {
        let color_code = active(&self.color_name).map(|name| code_for_name(refs.colors, name));
        let region = active(&self.region);
        let region_by_municipality = region.map(|_| {
            let mut map = HashMap::new();
            for m in refs.municipalities {
                map.entry(m.name.as_str()).or_insert(m.region.as_str());
            }
            map
        });

        EntryMatcher {
            date_range: self.date_range(),
            municipality: active(&self.municipality),
            producer: active(&self.producer),
            color_code,
            region,
            region_by_municipality,
        }
    }

    /// Entries passing every active filter
    pub fn apply(&self, entries: &[Entry], refs: ReferenceSet<'_>) -> Vec<Entry> {
        let matcher = self.matcher(refs);
        entries
            .iter()
            .filter(|e| matcher.matches(e))
            .cloned()
            .collect()
    }

    pub fn matches(&self, entry: &Entry, refs: ReferenceSet<'_>) -> bool {
        self.matcher(refs).matches(entry)
    }

    /// Producer list filter: municipality, region and producer apply,
    /// date and color do not
    pub fn matches_producer(&self, producer: &Producer, refs: ReferenceSet<'_>) -> bool {
        if let Some(m) = active(&self.municipality) {
            if producer.municipality != m {
                return false;
            }
        }
        if let Some(code) = active(&self.producer) {
            if producer.code != code {
                return false;
            }
        }
        if let Some(region) = active(&self.region) {
            let found = refs
                .municipalities
                .iter()
                .find(|m| m.name == producer.municipality);
            if found.map(|m| m.region.as_str()) != Some(region) {
                return false;
            }
        }
        true
    }

    /// Human-readable list of the applied filters, empty when none
    pub fn describe(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let (Some(from), Some(to)) = (active(&self.date_from), active(&self.date_to)) {
            if self.date_range().is_some() {
                out.push(format!(
                    "Período: {} a {}",
                    format_date_br(from),
                    format_date_br(to)
                ));
            }
        }
        if let Some(v) = active(&self.municipality) {
            out.push(format!("Município: {}", v));
        }
        if let Some(v) = active(&self.region) {
            out.push(format!("Região: {}", v));
        }
        if let Some(v) = active(&self.producer) {
            out.push(format!("Produtor: {}", v));
        }
        if let Some(v) = active(&self.color_name) {
            out.push(format!("Cor: {}", v));
        }
        out
    }
}

/// A filter with its reference joins resolved
#[derive(Debug)]
pub struct EntryMatcher<'a> {
    date_range: Option<(NaiveDate, NaiveDate)>,
    municipality: Option<&'a str>,
    producer: Option<&'a str>,
    /// `Some(None)`: a color was chosen but its name resolves to nothing
    color_code: Option<Option<i32>>,
    region: Option<&'a str>,
    region_by_municipality: Option<HashMap<&'a str, &'a str>>,
}

impl EntryMatcher<'_> {
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some((from, to)) = self.date_range {
            match entry.parsed_date() {
                Some(date) if date >= from && date <= to => {}
                _ => return false,
            }
        }
        if let Some(m) = self.municipality {
            if entry.municipality != m {
                return false;
            }
        }
        if let Some(p) = self.producer {
            if entry.producer_id != p {
                return false;
            }
        }
        if let Some(code) = self.color_code {
            if code != Some(entry.color_code) {
                return false;
            }
        }
        if let (Some(region), Some(map)) = (self.region, &self.region_by_municipality) {
            if map.get(entry.municipality.as_str()).copied() != Some(region) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, producer: &str, municipality: &str, color: i32, net: f64) -> Entry {
        Entry {
            date: date.into(),
            producer_id: producer.into(),
            producer_name: producer.into(),
            municipality: municipality.into(),
            color_code: color,
            net_weight: net,
            ..Default::default()
        }
    }

    fn municipalities() -> Vec<Municipality> {
        vec![
            Municipality {
                id: 1,
                name: "Picos".into(),
                region: "Sul".into(),
            },
            Municipality {
                id: 2,
                name: "Oeiras".into(),
                region: "Centro".into(),
            },
        ]
    }

    fn colors() -> Vec<Color> {
        vec![
            Color {
                code: 1,
                name: "Branco".into(),
                hex: "#fff".into(),
            },
            Color {
                code: 2,
                name: "Âmbar".into(),
                hex: "#c80".into(),
            },
        ]
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("2024-01-01", "P1", "Picos", 1, 10.0),
            entry("2024-01-31", "P2", "Oeiras", 2, 20.0),
            entry("2024-02-01", "P1", "Picos", 2, 30.0),
            entry("data ruim", "P3", "Desconhecido", 1, 40.0),
        ]
    }

    fn filter() -> ReportFilter {
        ReportFilter::default()
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let (m, c) = (municipalities(), colors());
        let refs = ReferenceSet::new(&m, &c);
        assert!(filter().is_empty());
        assert_eq!(filter().apply(&sample(), refs).len(), 4);
    }

    #[test]
    fn test_date_range_inclusive() {
        let (m, c) = (municipalities(), colors());
        let refs = ReferenceSet::new(&m, &c);
        let f = ReportFilter {
            date_from: Some("2024-01-01".into()),
            date_to: Some("2024-01-31".into()),
            ..filter()
        };
        let out = f.apply(&sample(), refs);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| e.date.starts_with("2024-01")));
    }

    #[test]
    fn test_single_bound_is_inactive() {
        let (m, c) = (municipalities(), colors());
        let refs = ReferenceSet::new(&m, &c);
        let f = ReportFilter {
            date_from: Some("2024-02-01".into()),
            date_to: Some("  ".into()),
            ..filter()
        };
        assert_eq!(f.apply(&sample(), refs).len(), 4);
    }

    #[test]
    fn test_date_filter_idempotent() {
        let (m, c) = (municipalities(), colors());
        let refs = ReferenceSet::new(&m, &c);
        let f = ReportFilter {
            date_from: Some("2024-01-15".into()),
            date_to: Some("2024-12-31".into()),
            ..filter()
        };
        let once = f.apply(&sample(), refs);
        let twice = f.apply(&once, refs);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_color_name_resolution() {
        let (m, c) = (municipalities(), colors());
        let refs = ReferenceSet::new(&m, &c);
        let f = ReportFilter {
            color_name: Some("Âmbar".into()),
            ..filter()
        };
        assert_eq!(f.apply(&sample(), refs).len(), 2);

        let unknown = ReportFilter {
            color_name: Some("Verde".into()),
            ..filter()
        };
        assert!(unknown.apply(&sample(), refs).is_empty());
    }

    #[test]
    fn test_region_joins_by_municipality_name() {
        let (m, c) = (municipalities(), colors());
        let refs = ReferenceSet::new(&m, &c);
        let f = ReportFilter {
            region: Some("Sul".into()),
            ..filter()
        };
        let out = f.apply(&sample(), refs);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| e.municipality == "Picos"));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let (m, c) = (municipalities(), colors());
        let refs = ReferenceSet::new(&m, &c);
        let f = ReportFilter {
            municipality: Some("Picos".into()),
            producer: Some("P1".into()),
            color_name: Some("Âmbar".into()),
            ..filter()
        };
        let out = f.apply(&sample(), refs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].net_weight, 30.0);

        let case = ReportFilter {
            municipality: Some("picos".into()),
            ..filter()
        };
        assert!(case.apply(&sample(), refs).is_empty());
    }

    #[test]
    fn test_matches_producer() {
        let (m, c) = (municipalities(), colors());
        let refs = ReferenceSet::new(&m, &c);
        let producer = Producer {
            id: 1,
            code: "P1".into(),
            name: "Ana".into(),
            cpf: String::new(),
            municipality: "Oeiras".into(),
            community: None,
            affiliation_date: None,
            status: Default::default(),
            certifications: vec![],
            phone: None,
            email: None,
            hive_count: None,
            notes: None,
        };
        let by_region = ReportFilter {
            region: Some("Centro".into()),
            date_from: Some("2030-01-01".into()),
            date_to: Some("2030-01-02".into()),
            ..filter()
        };
        assert!(by_region.matches_producer(&producer, refs));
        let other = ReportFilter {
            municipality: Some("Picos".into()),
            ..filter()
        };
        assert!(!other.matches_producer(&producer, refs));
    }

    #[test]
    fn test_describe() {
        let f = ReportFilter {
            date_from: Some("2024-01-01".into()),
            date_to: Some("2024-03-31".into()),
            municipality: Some("Picos".into()),
            region: Some(" ".into()),
            color_name: Some("Âmbar".into()),
            ..filter()
        };
        assert_eq!(
            f.describe(),
            vec![
                "Período: 01/01/2024 a 31/03/2024",
                "Município: Picos",
                "Cor: Âmbar",
            ]
        );
        assert!(filter().describe().is_empty());
    }
}
