//! Lenient decoding of numeric columns.
//!
//! Intake data has historically been typed by hand, so numeric columns can
//! arrive as numbers, numeric strings, blanks or garbage. Anything that is
//! not a finite number collapses to `0` instead of failing the whole fetch.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value to a finite `f64`, defaulting to `0`.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_number_text(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Parse numeric text using `.` as decimal separator; blank or invalid text is `0`.
pub fn parse_number_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

/// Parse a number typed into a form. Accepts both `12.5` and `12,5`.
///
/// Returns `None` for blank or invalid input so validation can flag it.
pub fn parse_decimal_input(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `deserialize_with` adapter for `f64` columns.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_number).unwrap_or(0.0))
}

/// `deserialize_with` adapter for integer code columns (truncates decimals).
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_number).unwrap_or(0.0) as i32)
}

/// `deserialize_with` adapter that maps a JSON `null` to `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `deserialize_with` adapter that maps blank strings to `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// `deserialize_with` adapter for optional counts (`null`, blank or negative is `None`).
pub fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => {
            let n = coerce_number(&v);
            if n >= 0.0 {
                Some(n as u32)
            } else {
                None
            }
        }
    })
}

/// `deserialize_with` adapter for text columns that may hold numbers
/// (e.g. a cooperative code stored as `123`). `null` becomes an empty string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Parse the date part of an ISO date or timestamp (`2024-01-15`, `2024-01-15T10:00:00Z`).
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `deserialize_with` adapter for optional date columns; unparseable text is `None`.
pub fn lenient_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_iso_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(12.5)), 12.5);
        assert_eq!(coerce_number(&json!("7.25")), 7.25);
        assert_eq!(coerce_number(&json!("  3 ")), 3.0);
        assert_eq!(coerce_number(&json!("")), 0.0);
        assert_eq!(coerce_number(&json!("abc")), 0.0);
        assert_eq!(coerce_number(&json!("NaN")), 0.0);
        assert_eq!(coerce_number(&json!(null)), 0.0);
        assert_eq!(coerce_number(&json!(true)), 1.0);
        assert_eq!(coerce_number(&json!([1, 2])), 0.0);
    }

    #[test]
    fn test_parse_decimal_input() {
        assert_eq!(parse_decimal_input("12,5"), Some(12.5));
        assert_eq!(parse_decimal_input("1.234,50"), Some(1234.5));
        assert_eq!(parse_decimal_input("12.5"), Some(12.5));
        assert_eq!(parse_decimal_input(" "), None);
        assert_eq!(parse_decimal_input("doze"), None);
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_f64")]
        weight: f64,
        #[serde(default, deserialize_with = "lenient_i32")]
        code: i32,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "blank_as_none")]
        note: Option<String>,
    }

    #[test]
    fn test_lenient_row() {
        let row: Row =
            serde_json::from_value(json!({"weight": "x", "code": "3", "tags": null, "note": " "}))
                .unwrap();
        assert_eq!(row.weight, 0.0);
        assert_eq!(row.code, 3);
        assert!(row.tags.is_empty());
        assert_eq!(row.note, None);

        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.weight, 0.0);
        assert_eq!(row.code, 0);
    }

    #[derive(Deserialize)]
    struct Other {
        #[serde(default, deserialize_with = "lenient_opt_u32")]
        hives: Option<u32>,
        #[serde(default, deserialize_with = "lenient_string")]
        code: String,
        #[serde(default, deserialize_with = "lenient_opt_date")]
        since: Option<NaiveDate>,
    }

    #[test]
    fn test_optional_columns() {
        let row: Other = serde_json::from_value(json!({
            "hives": "12",
            "code": 123,
            "since": "2023-05-02T00:00:00"
        }))
        .unwrap();
        assert_eq!(row.hives, Some(12));
        assert_eq!(row.code, "123");
        assert_eq!(row.since, NaiveDate::from_ymd_opt(2023, 5, 2));

        let row: Other =
            serde_json::from_value(json!({"hives": "", "code": null, "since": "ontem"})).unwrap();
        assert_eq!(row.hives, None);
        assert_eq!(row.code, "");
        assert_eq!(row.since, None);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2024-01-15"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_iso_date(" 2024-02-30 "), None);
        assert_eq!(parse_iso_date("15/01/2024"), None);
        assert_eq!(parse_iso_date(""), None);
    }
}
