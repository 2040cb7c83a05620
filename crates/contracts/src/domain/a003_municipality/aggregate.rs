use crate::domain::common::lenient::lenient_string;
use crate::domain::common::AggregateRoot;
use serde::{Deserialize, Serialize};

/// Reference row from `municipios`; the region drives the region filter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Municipality {
    pub id: i64,
    #[serde(rename = "nome", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "regiao", default, deserialize_with = "lenient_string")]
    pub region: String,
}

/// Distinct non-blank regions, sorted
pub fn regions(municipalities: &[Municipality]) -> Vec<String> {
    let mut out: Vec<String> = municipalities
        .iter()
        .map(|m| m.region.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}

impl AggregateRoot for Municipality {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "municipios"
    }

    fn element_name() -> &'static str {
        "Município"
    }

    fn list_name() -> &'static str {
        "Municípios"
    }

    fn tab_suffix() -> &'static str {
        "municipality"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_distinct_sorted() {
        let m = |name: &str, region: &str| Municipality {
            id: 0,
            name: name.into(),
            region: region.into(),
        };
        let list = vec![
            m("Picos", "Sul"),
            m("Oeiras", "Centro"),
            m("Itainópolis", "Sul"),
            m("X", " "),
        ];
        assert_eq!(regions(&list), vec!["Centro", "Sul"]);
    }
}
