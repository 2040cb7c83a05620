//! Registration / edit form state and its validation

use super::aggregate::{NewProducer, Producer, ProducerPatch, ProducerStatus};
use super::cpf;
use crate::domain::common::lenient::parse_iso_date;
use crate::shared::validation::{FieldErrors, ValidationRules};
use serde::{Deserialize, Serialize};

/// Raw text of every input of the producer form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProducerForm {
    pub code: String,
    pub name: String,
    pub cpf: String,
    pub municipality: String,
    pub community: String,
    /// ISO date from `<input type="date">`
    pub affiliation_date: String,
    pub status: ProducerStatus,
    /// Comma separated
    pub certifications: String,
    pub phone: String,
    pub email: String,
    pub hive_count: String,
    pub notes: String,
}

const CODE_RULES: ValidationRules = ValidationRules::required().with_max_length(20);
const NAME_RULES: ValidationRules = ValidationRules::required().with_max_length(120);
const MUNICIPALITY_RULES: ValidationRules = ValidationRules::required();

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ProducerForm {
    pub fn from_producer(producer: &Producer) -> Self {
        Self {
            code: producer.code.clone(),
            name: producer.name.clone(),
            cpf: producer.cpf.clone(),
            municipality: producer.municipality.clone(),
            community: producer.community.clone().unwrap_or_default(),
            affiliation_date: producer
                .affiliation_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: producer.status,
            certifications: producer.certifications.join(", "),
            phone: producer.phone.clone().unwrap_or_default(),
            email: producer.email.clone().unwrap_or_default(),
            hive_count: producer
                .hive_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
            notes: producer.notes.clone().unwrap_or_default(),
        }
    }

    /// Validate every field and build the normalized row
    pub fn validate(&self) -> Result<NewProducer, FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.check("code", CODE_RULES.validate_string(&self.code, "Código"));
        errors.check("name", NAME_RULES.validate_string(&self.name, "Nome"));
        errors.check("cpf", cpf::validate(&self.cpf));
        errors.check(
            "municipality",
            MUNICIPALITY_RULES.validate_string(&self.municipality, "Município"),
        );

        let affiliation_date = if self.affiliation_date.trim().is_empty() {
            None
        } else {
            errors.take(
                "affiliation_date",
                parse_iso_date(&self.affiliation_date)
                    .ok_or_else(|| "Data de filiação inválida".to_string()),
            )
        };

        let email = optional_text(&self.email);
        if let Some(email) = &email {
            if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
                errors.add("email", "E-mail inválido");
            }
        }

        let hive_count = match optional_text(&self.hive_count) {
            None => None,
            Some(text) => errors.take(
                "hive_count",
                text.parse::<u32>().map_err(|_| {
                    "Número de colmeias deve ser um inteiro não negativo".to_string()
                }),
            ),
        };

        errors.into_result()?;

        Ok(NewProducer {
            affiliation_date,
            email,
            hive_count,
            ..self.normalized()
        })
    }

    /// Trimmed row as the form would save it, without validation.
    /// Unparsable date or count read as empty.
    fn normalized(&self) -> NewProducer {
        NewProducer {
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            cpf: cpf::format(&self.cpf),
            municipality: self.municipality.trim().to_string(),
            community: optional_text(&self.community),
            affiliation_date: parse_iso_date(&self.affiliation_date),
            status: self.status,
            certifications: self
                .certifications
                .split(',')
                .filter_map(optional_text)
                .collect(),
            phone: optional_text(&self.phone),
            email: optional_text(&self.email),
            hive_count: optional_text(&self.hive_count).and_then(|t| t.parse().ok()),
            notes: optional_text(&self.notes),
        }
    }

    /// Validate and keep only what differs from the loaded row.
    ///
    /// The loaded row is compared in its normalized form, so a column stored
    /// unformatted (CPF without punctuation, blank community) is not sent
    /// back unless the user changed it.
    pub fn diff(&self, original: &Producer) -> Result<ProducerPatch, FieldErrors> {
        let edited = self.validate()?;
        let baseline = Self::from_producer(original)
            .normalized()
            .into_producer(original.id);
        Ok(ProducerPatch::between(&baseline, &edited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn producer() -> Producer {
        serde_json::from_value(json!({
            "id": 7,
            "codigo": "P007",
            "nome": "João Lima",
            "cpf": "529.982.247-25",
            "municipio": "Picos",
            "comunidade": null,
            "data_filiacao": null,
            "status": "ativo",
            "certificacoes": [],
            "num_colmeias": 12
        }))
        .unwrap()
    }

    #[test]
    fn test_form_roundtrip_has_no_changes() {
        let original = producer();
        let form = ProducerForm::from_producer(&original);
        assert!(form.diff(&original).unwrap().is_empty());
    }

    #[test]
    fn test_name_change_is_the_only_patch_field() {
        let original = producer();
        let mut form = ProducerForm::from_producer(&original);
        form.name = "  João P. Lima ".into();
        let patch = form.diff(&original).unwrap();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"nome": "João P. Lima"})
        );
    }

    #[test]
    fn test_unformatted_stored_columns_are_not_resent() {
        let original: Producer = serde_json::from_value(json!({
            "id": 9,
            "codigo": "P009",
            "nome": "João",
            "cpf": "52998224725",
            "municipio": "Picos",
            "comunidade": "",
            "telefone": " ",
            "certificacoes": [" orgânico "]
        }))
        .unwrap();
        let mut form = ProducerForm::from_producer(&original);
        form.name = "João Neto".into();
        let patch = form.diff(&original).unwrap();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"nome": "João Neto"})
        );

        let untouched = ProducerForm::from_producer(&original);
        assert!(untouched.diff(&original).unwrap().is_empty());
    }

    #[test]
    fn test_validation_errors() {
        let form = ProducerForm {
            cpf: "111.111.111-11".into(),
            email: "sem-arroba".into(),
            hive_count: "-3".into(),
            affiliation_date: "31/12/2020".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("code"), Some("Código é obrigatório"));
        assert_eq!(errors.get("name"), Some("Nome é obrigatório"));
        assert_eq!(errors.get("cpf"), Some("CPF inválido"));
        assert_eq!(errors.get("municipality"), Some("Município é obrigatório"));
        assert!(errors.get("email").is_some());
        assert!(errors.get("hive_count").is_some());
        assert!(errors.get("affiliation_date").is_some());
    }

    #[test]
    fn test_validate_normalizes() {
        let form = ProducerForm {
            code: "P010".into(),
            name: "Ana".into(),
            cpf: "52998224725".into(),
            municipality: "Picos".into(),
            community: " ".into(),
            certifications: "orgânico, , comércio justo".into(),
            hive_count: "15".into(),
            ..Default::default()
        };
        let row = form.validate().unwrap();
        assert_eq!(row.cpf, "529.982.247-25");
        assert_eq!(row.community, None);
        assert_eq!(row.certifications, vec!["orgânico", "comércio justo"]);
        assert_eq!(row.hive_count, Some(15));
        assert_eq!(row.status, ProducerStatus::Ativo);
    }
}
