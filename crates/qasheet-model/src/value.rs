use std::fmt;

use serde::{Deserialize, Serialize};

/// JSON-friendly representation of a cell value.
///
/// The enum uses an explicit `{type, value}` tagged layout for stable output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Empty / unset cell value.
    #[default]
    Empty,
    /// IEEE-754 double precision number.
    Number(f64),
    /// Plain string.
    String(String),
    Boolean(bool),
}

impl CellValue {
    /// Returns true if the value is [`CellValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Borrow the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Normalize a written value: empty strings are stored as [`CellValue::Empty`].
    pub(crate) fn normalized(self) -> Self {
        match self {
            CellValue::String(s) if s.is_empty() => CellValue::Empty,
            other => other,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl fmt::Display for CellValue {
    /// Display text as a spreadsheet would render it with the general format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => f.write_str(s),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_general_format() {
        assert_eq!(CellValue::from(12u32).to_string(), "12");
        assert_eq!(CellValue::from(1.5).to_string(), "1.5");
        assert_eq!(CellValue::from(true).to_string(), "TRUE");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn empty_strings_normalize_to_empty() {
        assert_eq!(CellValue::from("").normalized(), CellValue::Empty);
        assert_eq!(CellValue::from("x").normalized(), CellValue::from("x"));
    }

    #[test]
    fn serializes_with_tagged_layout() {
        let json = serde_json::to_string(&CellValue::from("OK")).unwrap();
        assert_eq!(json, r#"{"type":"string","value":"OK"}"#);
    }
}
