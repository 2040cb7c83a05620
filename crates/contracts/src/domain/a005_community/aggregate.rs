use crate::domain::common::lenient::lenient_string;
use crate::domain::common::AggregateRoot;
use serde::{Deserialize, Serialize};

/// Community inside a municipality (`comunidades`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Community {
    pub id: i64,
    #[serde(rename = "nome", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "municipio_id", default)]
    pub municipality_id: Option<i64>,
}

/// Communities of one municipality, for the cascading selector
pub fn of_municipality(communities: &[Community], municipality_id: i64) -> Vec<&Community> {
    communities
        .iter()
        .filter(|c| c.municipality_id == Some(municipality_id))
        .collect()
}

impl AggregateRoot for Community {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a005"
    }

    fn collection_name() -> &'static str {
        "comunidades"
    }

    fn element_name() -> &'static str {
        "Comunidade"
    }

    fn list_name() -> &'static str {
        "Comunidades"
    }

    fn tab_suffix() -> &'static str {
        "community"
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::a005_community::{of_municipality, Community};
    use serde_json::json;

    #[test]
    fn test_of_municipality_filters_by_id() {
        let communities: Vec<Community> = serde_json::from_value(json!([
            {"id": 1, "nome": "Baixa Grande", "municipio_id": 10},
            {"id": 2, "nome": "Sítio Novo", "municipio_id": 20},
            {"id": 3, "nome": "Sem município", "municipio_id": null},
            {"id": 4, "nome": "Lagoa", "municipio_id": 10}
        ]))
        .unwrap();
        let names: Vec<&str> = of_municipality(&communities, 10)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Baixa Grande", "Lagoa"]);
        assert!(of_municipality(&communities, 99).is_empty());
    }
}
