use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Primary key of a BaaS table row
pub trait AggregateId:
    Clone + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Render the key the way it appears in a URL
    fn as_string(&self) -> String;

    /// Parse a key coming from a URL or a form
    fn from_string(s: &str) -> Result<Self, String>;

    /// PostgREST equality operand for this key, e.g. `eq.42`
    fn eq_filter(&self) -> String {
        format!("eq.{}", self.as_string())
    }
}

impl AggregateId for i32 {
    fn as_string(&self) -> String {
        ToString::to_string(self)
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.trim()
            .parse::<i32>()
            .map_err(|e| format!("Invalid i32 id '{}': {}", s, e))
    }
}

impl AggregateId for i64 {
    fn as_string(&self) -> String {
        ToString::to_string(self)
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.trim()
            .parse::<i64>()
            .map_err(|e| format!("Invalid i64 id '{}': {}", s, e))
    }
}

impl AggregateId for uuid::Uuid {
    fn as_string(&self) -> String {
        self.hyphenated().to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim()).map_err(|e| format!("Invalid UUID '{}': {}", s, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filter() {
        assert_eq!(42i64.eq_filter(), "eq.42");
        let id = uuid::Uuid::nil();
        assert_eq!(id.eq_filter(), "eq.00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_from_string() {
        assert_eq!(i64::from_string(" 7 "), Ok(7));
        assert!(i32::from_string("abc").is_err());
    }
}
