//! Intake form and edit modal state

use super::aggregate::{total_of, Entry, EntryPatch, NewEntry};
use crate::domain::a001_producer::Producer;
use crate::domain::common::lenient::{parse_decimal_input, parse_iso_date};
use crate::shared::format::format_decimal;
use crate::shared::validation::{FieldErrors, ValidationRules};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryForm {
    pub date: String,
    pub producer_id: String,
    pub producer_name: String,
    pub municipality: String,
    pub community: String,
    pub gross_weight: String,
    pub tare: String,
    pub net_weight: String,
    pub unit_value: String,
    pub color_code: String,
    pub humidity: String,
    pub lot: String,
    pub contract: String,
    pub invoice_number: String,
    pub analysis_date: String,
    pub notes: String,
}

const WEIGHT_RULES: ValidationRules = ValidationRules::non_negative();
const TARE_RULES: ValidationRules = ValidationRules {
    required: false,
    ..ValidationRules::non_negative()
};
const HUMIDITY_RULES: ValidationRules = ValidationRules::range(0.0, 100.0);

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn number_text(value: f64) -> String {
    // plain text for inputs, no thousands separator
    let s = format!("{}", value);
    s.replace('.', ",")
}

impl EntryForm {
    /// Empty intake form dated `today` (ISO)
    pub fn new_for_date(today: &str) -> Self {
        Self {
            date: today.to_string(),
            ..Default::default()
        }
    }

    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            date: entry.date.clone(),
            producer_id: entry.producer_id.clone(),
            producer_name: entry.producer_name.clone(),
            municipality: entry.municipality.clone(),
            community: entry.community.clone().unwrap_or_default(),
            gross_weight: number_text(entry.gross_weight),
            tare: number_text(entry.tare),
            net_weight: number_text(entry.net_weight),
            unit_value: number_text(entry.unit_value),
            color_code: entry.color_code.to_string(),
            humidity: number_text(entry.humidity),
            lot: entry.lot.clone().unwrap_or_default(),
            contract: entry.contract.clone().unwrap_or_default(),
            invoice_number: entry.invoice_number.clone().unwrap_or_default(),
            analysis_date: entry.analysis_date.clone().unwrap_or_default(),
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }

    /// Copy the producer's identity into the entry, as stored at intake time
    pub fn select_producer(&mut self, producer: &Producer) {
        self.producer_id = producer.code.clone();
        self.producer_name = producer.name.clone();
        self.municipality = producer.municipality.clone();
        self.community = producer.community.clone().unwrap_or_default();
    }

    /// Fill net weight from gross and tare when both parse
    pub fn fill_net_weight(&mut self) {
        if let Some(gross) = parse_decimal_input(&self.gross_weight) {
            let tare = parse_decimal_input(&self.tare).unwrap_or(0.0);
            if gross >= tare {
                self.net_weight = format_decimal(gross - tare, 2).replace('.', "");
            }
        }
    }

    /// Total shown next to the inputs while the user types
    pub fn live_total(&self) -> Option<f64> {
        let net = parse_decimal_input(&self.net_weight)?;
        let unit = parse_decimal_input(&self.unit_value)?;
        Some(total_of(net, unit))
    }

    pub fn validate(&self) -> Result<NewEntry, FieldErrors> {
        let mut errors = FieldErrors::new();

        let date = self.date.trim().to_string();
        if date.is_empty() {
            errors.add("date", "Data é obrigatória");
        } else if parse_iso_date(&date).is_none() {
            errors.add("date", "Data inválida");
        }

        if self.producer_id.trim().is_empty() {
            errors.add("producer_id", "Selecione o produtor");
        }

        let gross = errors
            .take(
                "gross_weight",
                WEIGHT_RULES.validate_decimal_input(&self.gross_weight, "Peso bruto"),
            )
            .flatten();
        let tare = errors
            .take("tare", TARE_RULES.validate_decimal_input(&self.tare, "Tara"))
            .flatten()
            .unwrap_or(0.0);
        let net = errors
            .take(
                "net_weight",
                WEIGHT_RULES.validate_decimal_input(&self.net_weight, "Peso líquido"),
            )
            .flatten();
        if let (Some(gross), Some(net)) = (gross, net) {
            if net > gross {
                errors.add("net_weight", "Peso líquido não pode ser maior que o peso bruto");
            }
        }
        let unit = errors
            .take(
                "unit_value",
                WEIGHT_RULES.validate_decimal_input(&self.unit_value, "Valor unitário"),
            )
            .flatten();

        let color_code = match self.color_code.trim().parse::<i32>() {
            Ok(code) => Some(code),
            Err(_) => {
                errors.add("color_code", "Selecione a cor");
                None
            }
        };

        let humidity = errors
            .take(
                "humidity",
                HUMIDITY_RULES.validate_decimal_input(&self.humidity, "Umidade"),
            )
            .flatten()
            .unwrap_or(0.0);

        errors.into_result()?;

        let (Some(gross_weight), Some(net_weight), Some(unit_value), Some(color_code)) =
            (gross, net, unit, color_code)
        else {
            // every None above recorded an error
            return Err(FieldErrors::new());
        };

        Ok(NewEntry {
            date,
            producer_id: self.producer_id.trim().to_string(),
            producer_name: self.producer_name.trim().to_string(),
            municipality: self.municipality.trim().to_string(),
            community: optional_text(&self.community),
            gross_weight,
            net_weight,
            tare,
            unit_value,
            total_value: total_of(net_weight, unit_value),
            color_code,
            humidity,
            lot: optional_text(&self.lot),
            contract: optional_text(&self.contract),
            invoice_number: optional_text(&self.invoice_number),
            analysis_date: optional_text(&self.analysis_date),
            notes: optional_text(&self.notes),
        })
    }

    pub fn diff(&self, original: &Entry) -> Result<EntryPatch, FieldErrors> {
        let edited = self.validate()?;
        Ok(EntryPatch::between(original, &edited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry() -> Entry {
        serde_json::from_value(json!({
            "id": 9,
            "data": "2024-01-10",
            "produtor_id": "P001",
            "produtor_nome": "Ana",
            "municipio": "Picos",
            "comunidade": null,
            "peso_bruto": 110.0,
            "peso_liquido": 100.0,
            "tara": 10.0,
            "valor_unitario": 12.5,
            "valor_total": 1250.0,
            "cor_codigo": 2,
            "umidade": 18.5,
            "lote": "L-1"
        }))
        .unwrap()
    }

    fn filled() -> EntryForm {
        EntryForm {
            date: "2024-02-01".into(),
            producer_id: "P001".into(),
            producer_name: "Ana".into(),
            municipality: "Picos".into(),
            gross_weight: "110,5".into(),
            tare: "0,5".into(),
            net_weight: "110".into(),
            unit_value: "12,5".into(),
            color_code: "2".into(),
            humidity: "18".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_computes_total() {
        let row = filled().validate().unwrap();
        assert_eq!(row.net_weight, 110.0);
        assert_eq!(row.total_value, 1375.0);
        assert_eq!(row.community, None);
    }

    #[test]
    fn test_net_above_gross_rejected() {
        let mut form = filled();
        form.net_weight = "200".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("net_weight"),
            Some("Peso líquido não pode ser maior que o peso bruto")
        );
    }

    #[test]
    fn test_required_and_ranges() {
        let form = EntryForm {
            humidity: "120".into(),
            gross_weight: "-1".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("date"), Some("Data é obrigatória"));
        assert_eq!(errors.get("producer_id"), Some("Selecione o produtor"));
        assert_eq!(errors.get("gross_weight"), Some("Peso bruto não pode ser negativo"));
        assert_eq!(errors.get("color_code"), Some("Selecione a cor"));
        assert!(errors.get("humidity").is_some());
        assert!(errors.get("tare").is_none());
    }

    #[test]
    fn test_edit_unit_value_carries_recomputed_total() {
        let original = entry();
        let mut form = EntryForm::from_entry(&original);
        form.unit_value = "13".into();
        assert_eq!(form.live_total(), Some(1300.0));

        let patch = form.diff(&original).unwrap();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"valor_unitario": 13.0, "valor_total": 1300.0})
        );

        let mut updated = original.clone();
        patch.apply_to(&mut updated);
        assert_eq!(updated.total_value, updated.computed_total());
        assert_eq!(updated.total_value, form.live_total().unwrap());
    }

    #[test]
    fn test_unchanged_edit_is_empty() {
        let original = entry();
        let form = EntryForm::from_entry(&original);
        assert!(form.diff(&original).unwrap().is_empty());
    }

    #[test]
    fn test_fill_net_weight_and_select_producer() {
        let mut form = EntryForm::new_for_date("2024-03-01");
        form.gross_weight = "1.250,5".into();
        form.tare = "10,5".into();
        form.fill_net_weight();
        assert_eq!(form.net_weight, "1240,00");

        let producer: Producer = serde_json::from_value(json!({
            "id": 1, "codigo": "P002", "nome": "Rui", "municipio": "Oeiras", "comunidade": "Centro"
        }))
        .unwrap();
        form.select_producer(&producer);
        assert_eq!(form.producer_id, "P002");
        assert_eq!(form.community, "Centro");
    }
}
