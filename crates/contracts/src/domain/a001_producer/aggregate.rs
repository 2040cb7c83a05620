use crate::domain::common::lenient::{
    blank_as_none, lenient_opt_date, lenient_opt_u32, lenient_string, null_as_default,
};
use crate::domain::common::AggregateRoot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Status
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProducerStatus {
    #[default]
    Ativo,
    Suspenso,
    /// Unknown values coming from the table are read as inactive
    #[serde(other)]
    Inativo,
}

impl ProducerStatus {
    pub const ALL: [ProducerStatus; 3] = [
        ProducerStatus::Ativo,
        ProducerStatus::Inativo,
        ProducerStatus::Suspenso,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProducerStatus::Ativo => "ativo",
            ProducerStatus::Inativo => "inativo",
            ProducerStatus::Suspenso => "suspenso",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProducerStatus::Ativo => "Ativo",
            ProducerStatus::Inativo => "Inativo",
            ProducerStatus::Suspenso => "Suspenso",
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .unwrap_or_default()
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Registered cooperative member (`produtores`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub id: i64,

    /// Cooperative code, the key entries refer to
    #[serde(rename = "codigo", default, deserialize_with = "lenient_string")]
    pub code: String,

    #[serde(rename = "nome", default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub cpf: String,

    #[serde(rename = "municipio", default, deserialize_with = "lenient_string")]
    pub municipality: String,

    /// Blank community reads as missing
    #[serde(rename = "comunidade", default, deserialize_with = "blank_as_none")]
    pub community: Option<String>,

    #[serde(
        rename = "data_filiacao",
        default,
        deserialize_with = "lenient_opt_date"
    )]
    pub affiliation_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ProducerStatus,

    #[serde(
        rename = "certificacoes",
        default,
        deserialize_with = "null_as_default"
    )]
    pub certifications: Vec<String>,

    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(
        rename = "num_colmeias",
        default,
        deserialize_with = "lenient_opt_u32"
    )]
    pub hive_count: Option<u32>,

    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
}

impl Producer {
    /// `"123 - Maria Souza"`, used by selectors
    pub fn display_label(&self) -> String {
        if self.code.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.code, self.name)
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProducerStatus::Ativo
    }
}

impl AggregateRoot for Producer {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "produtores"
    }

    fn element_name() -> &'static str {
        "Produtor"
    }

    fn list_name() -> &'static str {
        "Produtores"
    }

    fn tab_suffix() -> &'static str {
        "producer"
    }
}

// ============================================================================
// Insert / partial update payloads
// ============================================================================

/// Row sent by the registration form. The id is assigned by the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProducer {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "municipio")]
    pub municipality: String,
    #[serde(rename = "comunidade")]
    pub community: Option<String>,
    #[serde(rename = "data_filiacao")]
    pub affiliation_date: Option<NaiveDate>,
    pub status: ProducerStatus,
    #[serde(rename = "certificacoes")]
    pub certifications: Vec<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "num_colmeias")]
    pub hive_count: Option<u32>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

impl NewProducer {
    /// Materialize the row the table would hold after the insert
    pub fn into_producer(self, id: i64) -> Producer {
        Producer {
            id,
            code: self.code,
            name: self.name,
            cpf: self.cpf,
            municipality: self.municipality,
            community: self.community,
            affiliation_date: self.affiliation_date,
            status: self.status,
            certifications: self.certifications,
            phone: self.phone,
            email: self.email,
            hive_count: self.hive_count,
            notes: self.notes,
        }
    }
}

/// Changed fields only. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProducerPatch {
    #[serde(rename = "codigo", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "municipio", skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(rename = "comunidade", skip_serializing_if = "Option::is_none")]
    pub community: Option<Option<String>>,
    #[serde(rename = "data_filiacao", skip_serializing_if = "Option::is_none")]
    pub affiliation_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProducerStatus>,
    #[serde(rename = "certificacoes", skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(rename = "num_colmeias", skip_serializing_if = "Option::is_none")]
    pub hive_count: Option<Option<u32>>,
    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

fn changed<T: PartialEq + Clone>(original: &T, edited: &T) -> Option<T> {
    (original != edited).then(|| edited.clone())
}

impl ProducerPatch {
    /// Fields of `edited` that differ from `original`
    pub fn between(original: &Producer, edited: &NewProducer) -> Self {
        Self {
            code: changed(&original.code, &edited.code),
            name: changed(&original.name, &edited.name),
            cpf: changed(&original.cpf, &edited.cpf),
            municipality: changed(&original.municipality, &edited.municipality),
            community: changed(&original.community, &edited.community),
            affiliation_date: changed(&original.affiliation_date, &edited.affiliation_date),
            status: changed(&original.status, &edited.status),
            certifications: changed(&original.certifications, &edited.certifications),
            phone: changed(&original.phone, &edited.phone),
            email: changed(&original.email, &edited.email),
            hive_count: changed(&original.hive_count, &edited.hive_count),
            notes: changed(&original.notes, &edited.notes),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a loaded row (used by the in-memory repository)
    pub fn apply_to(&self, producer: &mut Producer) {
        if let Some(v) = &self.code {
            producer.code = v.clone();
        }
        if let Some(v) = &self.name {
            producer.name = v.clone();
        }
        if let Some(v) = &self.cpf {
            producer.cpf = v.clone();
        }
        if let Some(v) = &self.municipality {
            producer.municipality = v.clone();
        }
        if let Some(v) = &self.community {
            producer.community = v.clone();
        }
        if let Some(v) = self.affiliation_date {
            producer.affiliation_date = v;
        }
        if let Some(v) = self.status {
            producer.status = v;
        }
        if let Some(v) = &self.certifications {
            producer.certifications = v.clone();
        }
        if let Some(v) = &self.phone {
            producer.phone = v.clone();
        }
        if let Some(v) = &self.email {
            producer.email = v.clone();
        }
        if let Some(v) = self.hive_count {
            producer.hive_count = v;
        }
        if let Some(v) = &self.notes {
            producer.notes = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Producer {
        serde_json::from_value(json!({
            "id": 1,
            "codigo": "P001",
            "nome": "Maria Souza",
            "cpf": "529.982.247-25",
            "municipio": "Picos",
            "comunidade": "Baixa Grande",
            "data_filiacao": "2020-03-01",
            "status": "ativo",
            "certificacoes": ["organico"],
            "telefone": null,
            "email": "maria@example.com",
            "num_colmeias": "40",
            "observacoes": null
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_columns() {
        let p = sample();
        assert_eq!(p.code, "P001");
        assert_eq!(p.hive_count, Some(40));
        assert_eq!(p.affiliation_date, NaiveDate::from_ymd_opt(2020, 3, 1));
        assert_eq!(p.display_label(), "P001 - Maria Souza");
        assert!(p.is_active());
    }

    #[test]
    fn test_status_fallbacks() {
        let p: Producer =
            serde_json::from_value(json!({"id": 2, "nome": "X", "status": "desconhecido"}))
                .unwrap();
        assert_eq!(p.status, ProducerStatus::Inativo);
        for status in ProducerStatus::ALL {
            let p: Producer =
                serde_json::from_value(json!({"id": 4, "status": status.as_str()})).unwrap();
            assert_eq!(p.status, status);
        }
        let p: Producer = serde_json::from_value(json!({"id": 3, "status": null})).unwrap();
        assert_eq!(p.status, ProducerStatus::Ativo);
        assert!(p.certifications.is_empty());
        assert_eq!(
            ProducerStatus::from_str_or_default("suspenso"),
            ProducerStatus::Suspenso
        );
    }

    #[test]
    fn test_blank_community_is_missing() {
        let p: Producer = serde_json::from_value(json!({"id": 5, "comunidade": "  "})).unwrap();
        assert_eq!(p.community, None);
        let p: Producer =
            serde_json::from_value(json!({"id": 6, "comunidade": "Baixa Grande"})).unwrap();
        assert_eq!(p.community.as_deref(), Some("Baixa Grande"));
    }

    #[test]
    fn test_patch_serializes_only_changes() {
        let original = sample();
        let mut edited = NewProducer {
            code: original.code.clone(),
            name: "Maria S. Lima".into(),
            cpf: original.cpf.clone(),
            municipality: original.municipality.clone(),
            community: original.community.clone(),
            affiliation_date: original.affiliation_date,
            status: original.status,
            certifications: original.certifications.clone(),
            phone: original.phone.clone(),
            email: None,
            hive_count: original.hive_count,
            notes: original.notes.clone(),
        };
        let patch = ProducerPatch::between(&original, &edited);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"nome": "Maria S. Lima", "email": null})
        );

        let mut applied = original.clone();
        patch.apply_to(&mut applied);
        assert_eq!(applied.name, "Maria S. Lima");
        assert_eq!(applied.email, None);

        edited.name = original.name.clone();
        edited.email = original.email.clone();
        assert!(ProducerPatch::between(&original, &edited).is_empty());
    }
}
