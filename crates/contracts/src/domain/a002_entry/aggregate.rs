use crate::domain::common::lenient::{
    blank_as_none, lenient_f64, lenient_i32, lenient_string, parse_iso_date,
};
use crate::domain::common::AggregateRoot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One honey delivery (`entradas`).
///
/// Producer name, municipality and community are copied from the producer at
/// intake time and are not kept in sync afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,

    /// ISO date as stored; may be malformed in old rows
    #[serde(rename = "data", default, deserialize_with = "lenient_string")]
    pub date: String,

    /// Cooperative code of the producer
    #[serde(rename = "produtor_id", default, deserialize_with = "lenient_string")]
    pub producer_id: String,

    #[serde(rename = "produtor_nome", default, deserialize_with = "lenient_string")]
    pub producer_name: String,

    #[serde(rename = "municipio", default, deserialize_with = "lenient_string")]
    pub municipality: String,

    #[serde(rename = "comunidade", default, deserialize_with = "blank_as_none")]
    pub community: Option<String>,

    #[serde(rename = "peso_bruto", default, deserialize_with = "lenient_f64")]
    pub gross_weight: f64,

    #[serde(rename = "peso_liquido", default, deserialize_with = "lenient_f64")]
    pub net_weight: f64,

    #[serde(rename = "tara", default, deserialize_with = "lenient_f64")]
    pub tare: f64,

    #[serde(rename = "valor_unitario", default, deserialize_with = "lenient_f64")]
    pub unit_value: f64,

    #[serde(rename = "valor_total", default, deserialize_with = "lenient_f64")]
    pub total_value: f64,

    #[serde(rename = "cor_codigo", default, deserialize_with = "lenient_i32")]
    pub color_code: i32,

    #[serde(rename = "umidade", default, deserialize_with = "lenient_f64")]
    pub humidity: f64,

    #[serde(rename = "lote", default)]
    pub lot: Option<String>,

    #[serde(rename = "contrato", default)]
    pub contract: Option<String>,

    #[serde(rename = "nota_fiscal", default)]
    pub invoice_number: Option<String>,

    /// Free text, not validated as a date
    #[serde(rename = "data_analise", default)]
    pub analysis_date: Option<String>,

    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
}

impl Entry {
    /// Calendar date of the delivery, `None` when the stored text does not parse
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }

    /// `net_weight * unit_value`
    pub fn computed_total(&self) -> f64 {
        total_of(self.net_weight, self.unit_value)
    }

    pub fn recompute_total(&mut self) {
        self.total_value = self.computed_total();
    }

    /// Community name, treating blank as missing
    pub fn community_name(&self) -> Option<&str> {
        self.community
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

pub(crate) fn total_of(net_weight: f64, unit_value: f64) -> f64 {
    net_weight * unit_value
}

impl AggregateRoot for Entry {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "entradas"
    }

    fn element_name() -> &'static str {
        "Entrada"
    }

    fn list_name() -> &'static str {
        "Entradas"
    }

    fn tab_suffix() -> &'static str {
        "entry"
    }
}

/// Row sent by the intake form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEntry {
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "produtor_id")]
    pub producer_id: String,
    #[serde(rename = "produtor_nome")]
    pub producer_name: String,
    #[serde(rename = "municipio")]
    pub municipality: String,
    #[serde(rename = "comunidade")]
    pub community: Option<String>,
    #[serde(rename = "peso_bruto")]
    pub gross_weight: f64,
    #[serde(rename = "peso_liquido")]
    pub net_weight: f64,
    #[serde(rename = "tara")]
    pub tare: f64,
    #[serde(rename = "valor_unitario")]
    pub unit_value: f64,
    #[serde(rename = "valor_total")]
    pub total_value: f64,
    #[serde(rename = "cor_codigo")]
    pub color_code: i32,
    #[serde(rename = "umidade")]
    pub humidity: f64,
    #[serde(rename = "lote")]
    pub lot: Option<String>,
    #[serde(rename = "contrato")]
    pub contract: Option<String>,
    #[serde(rename = "nota_fiscal")]
    pub invoice_number: Option<String>,
    #[serde(rename = "data_analise")]
    pub analysis_date: Option<String>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

impl NewEntry {
    pub fn into_entry(self, id: i64) -> Entry {
        Entry {
            id,
            date: self.date,
            producer_id: self.producer_id,
            producer_name: self.producer_name,
            municipality: self.municipality,
            community: self.community,
            gross_weight: self.gross_weight,
            net_weight: self.net_weight,
            tare: self.tare,
            unit_value: self.unit_value,
            total_value: self.total_value,
            color_code: self.color_code,
            humidity: self.humidity,
            lot: self.lot,
            contract: self.contract,
            invoice_number: self.invoice_number,
            analysis_date: self.analysis_date,
            notes: self.notes,
        }
    }
}

/// Changed fields only.
///
/// Whenever net weight or unit value change, the recomputed total travels
/// with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryPatch {
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "produtor_id", skip_serializing_if = "Option::is_none")]
    pub producer_id: Option<String>,
    #[serde(rename = "produtor_nome", skip_serializing_if = "Option::is_none")]
    pub producer_name: Option<String>,
    #[serde(rename = "municipio", skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(rename = "comunidade", skip_serializing_if = "Option::is_none")]
    pub community: Option<Option<String>>,
    #[serde(rename = "peso_bruto", skip_serializing_if = "Option::is_none")]
    pub gross_weight: Option<f64>,
    #[serde(rename = "peso_liquido", skip_serializing_if = "Option::is_none")]
    pub net_weight: Option<f64>,
    #[serde(rename = "tara", skip_serializing_if = "Option::is_none")]
    pub tare: Option<f64>,
    #[serde(rename = "valor_unitario", skip_serializing_if = "Option::is_none")]
    pub unit_value: Option<f64>,
    #[serde(rename = "valor_total", skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
    #[serde(rename = "cor_codigo", skip_serializing_if = "Option::is_none")]
    pub color_code: Option<i32>,
    #[serde(rename = "umidade", skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(rename = "lote", skip_serializing_if = "Option::is_none")]
    pub lot: Option<Option<String>>,
    #[serde(rename = "contrato", skip_serializing_if = "Option::is_none")]
    pub contract: Option<Option<String>>,
    #[serde(rename = "nota_fiscal", skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<Option<String>>,
    #[serde(rename = "data_analise", skip_serializing_if = "Option::is_none")]
    pub analysis_date: Option<Option<String>>,
    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

fn changed<T: PartialEq + Clone>(original: &T, edited: &T) -> Option<T> {
    (original != edited).then(|| edited.clone())
}

impl EntryPatch {
    pub fn between(original: &Entry, edited: &NewEntry) -> Self {
        let mut patch = Self {
            date: changed(&original.date, &edited.date),
            producer_id: changed(&original.producer_id, &edited.producer_id),
            producer_name: changed(&original.producer_name, &edited.producer_name),
            municipality: changed(&original.municipality, &edited.municipality),
            community: changed(&original.community, &edited.community),
            gross_weight: changed(&original.gross_weight, &edited.gross_weight),
            net_weight: changed(&original.net_weight, &edited.net_weight),
            tare: changed(&original.tare, &edited.tare),
            unit_value: changed(&original.unit_value, &edited.unit_value),
            total_value: None,
            color_code: changed(&original.color_code, &edited.color_code),
            humidity: changed(&original.humidity, &edited.humidity),
            lot: changed(&original.lot, &edited.lot),
            contract: changed(&original.contract, &edited.contract),
            invoice_number: changed(&original.invoice_number, &edited.invoice_number),
            analysis_date: changed(&original.analysis_date, &edited.analysis_date),
            notes: changed(&original.notes, &edited.notes),
        };
        let total = total_of(edited.net_weight, edited.unit_value);
        if patch.net_weight.is_some() || patch.unit_value.is_some() || original.total_value != total
        {
            patch.total_value = Some(total);
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, entry: &mut Entry) {
        if let Some(v) = &self.date {
            entry.date = v.clone();
        }
        if let Some(v) = &self.producer_id {
            entry.producer_id = v.clone();
        }
        if let Some(v) = &self.producer_name {
            entry.producer_name = v.clone();
        }
        if let Some(v) = &self.municipality {
            entry.municipality = v.clone();
        }
        if let Some(v) = &self.community {
            entry.community = v.clone();
        }
        if let Some(v) = self.gross_weight {
            entry.gross_weight = v;
        }
        if let Some(v) = self.net_weight {
            entry.net_weight = v;
        }
        if let Some(v) = self.tare {
            entry.tare = v;
        }
        if let Some(v) = self.unit_value {
            entry.unit_value = v;
        }
        if let Some(v) = self.total_value {
            entry.total_value = v;
        }
        if let Some(v) = self.color_code {
            entry.color_code = v;
        }
        if let Some(v) = self.humidity {
            entry.humidity = v;
        }
        if let Some(v) = &self.lot {
            entry.lot = v.clone();
        }
        if let Some(v) = &self.contract {
            entry.contract = v.clone();
        }
        if let Some(v) = &self.invoice_number {
            entry.invoice_number = v.clone();
        }
        if let Some(v) = &self.analysis_date {
            entry.analysis_date = v.clone();
        }
        if let Some(v) = &self.notes {
            entry.notes = v.clone();
        }
    }
}
