//! Field validation for the registration, intake and edit forms

use std::collections::BTreeMap;
use thiserror::Error;

/// Validation rules for a single form field
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidationRules {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl ValidationRules {
    /// No constraints
    pub const fn none() -> Self {
        Self {
            required: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
        }
    }

    pub const fn required() -> Self {
        Self {
            required: true,
            ..Self::none()
        }
    }

    /// Required number that may not be negative
    pub const fn non_negative() -> Self {
        Self {
            required: true,
            min: Some(0.0),
            ..Self::none()
        }
    }

    pub const fn range(min: f64, max: f64) -> Self {
        Self {
            required: false,
            min: Some(min),
            max: Some(max),
            min_length: None,
            max_length: None,
        }
    }

    pub const fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Validate a string value against the rules
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        let len = value.trim().chars().count();
        if self.required && len == 0 {
            return Err(format!("{} é obrigatório", field_label));
        }

        if let Some(min) = self.min_length {
            if len > 0 && len < min {
                return Err(format!(
                    "{} deve ter no mínimo {} caracteres",
                    field_label, min
                ));
            }
        }

        if let Some(max) = self.max_length {
            if len > max {
                return Err(format!(
                    "{} deve ter no máximo {} caracteres",
                    field_label, max
                ));
            }
        }

        Ok(())
    }

    /// Validate a numeric value against min/max rules
    pub fn validate_number(&self, value: f64, field_label: &str) -> Result<(), String> {
        if let Some(min) = self.min {
            if value < min {
                if min == 0.0 {
                    return Err(format!("{} não pode ser negativo", field_label));
                }
                return Err(format!("{} deve ser no mínimo {}", field_label, min));
            }
        }

        if let Some(max) = self.max {
            if value > max {
                return Err(format!("{} deve ser no máximo {}", field_label, max));
            }
        }

        Ok(())
    }

    /// Validate numeric text typed into a form (accepts `12,5`).
    /// Returns the parsed value; blank optional input yields `None`.
    pub fn validate_decimal_input(
        &self,
        text: &str,
        field_label: &str,
    ) -> Result<Option<f64>, String> {
        if text.trim().is_empty() {
            if self.required {
                return Err(format!("{} é obrigatório", field_label));
            }
            return Ok(None);
        }
        let value = crate::domain::common::lenient::parse_decimal_input(text)
            .ok_or_else(|| format!("{} deve ser um número", field_label))?;
        self.validate_number(value, field_label)?;
        Ok(Some(value))
    }
}

/// Per-field validation messages collected from a form.
///
/// Keys are the form field names, so views can render each message inline.
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{} campo(s) inválido(s)", .0.len())]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Record the error of a validation result, if any
    pub fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    /// Like [`check`](Self::check), keeping the successful value
    pub fn take<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when no field failed
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}
