use crate::domain::a002_entry::Entry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Headline numbers over a filtered entry set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Sum of net weights (kg)
    pub total_production: f64,
    pub total_value: f64,
    pub entry_count: usize,
    /// Distinct producer codes
    pub producer_count: usize,
    /// `total_value / total_production`, 0 without production
    pub average_unit_price: f64,
}

impl ReportSummary {
    pub fn from_entries(entries: &[Entry]) -> Self {
        let total_production: f64 = entries.iter().map(|e| e.net_weight).sum();
        let total_value: f64 = entries.iter().map(|e| e.total_value).sum();
        let producer_count = entries
            .iter()
            .map(|e| e.producer_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let average_unit_price = if total_production > 0.0 {
            total_value / total_production
        } else {
            0.0
        };
        Self {
            total_production,
            total_value,
            entry_count: entries.len(),
            producer_count,
            average_unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let e = |producer: &str, net: f64, value: f64| Entry {
            producer_id: producer.into(),
            net_weight: net,
            total_value: value,
            ..Default::default()
        };
        let s = ReportSummary::from_entries(&[
            e("P1", 10.0, 100.0),
            e("P2", 30.0, 500.0),
            e("P1", 10.0, 200.0),
        ]);
        assert_eq!(s.total_production, 50.0);
        assert_eq!(s.total_value, 800.0);
        assert_eq!(s.entry_count, 3);
        assert_eq!(s.producer_count, 2);
        assert_eq!(s.average_unit_price, 16.0);
        assert_eq!(ReportSummary::from_entries(&[]).average_unit_price, 0.0);
    }
}
