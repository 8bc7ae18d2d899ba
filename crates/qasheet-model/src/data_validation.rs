use serde::{Deserialize, Serialize};

use crate::{CellRef, CellValue, Range};

/// The kind of data validation rule (the OOXML `type` attribute).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataValidationKind {
    /// Entry must be one of an explicit list of values.
    List,
}

/// How the host reacts to an entry that fails validation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataValidationErrorStyle {
    /// Reject the entry.
    #[default]
    Stop,
    /// Warn, but allow the entry.
    Warning,
    /// Inform, allow the entry.
    Information,
}

/// A single data validation rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataValidation {
    pub kind: DataValidationKind,
    /// For list rules: the allowed values as a quoted, comma-separated literal
    /// (e.g. `"Yes,No"` including the quotes), matching SpreadsheetML.
    pub formula1: String,
    #[serde(default)]
    pub allow_blank: bool,
    #[serde(default)]
    pub show_error_message: bool,
    /// Show the in-cell dropdown arrow.
    #[serde(default)]
    pub show_drop_down: bool,
    #[serde(default)]
    pub error_style: DataValidationErrorStyle,
}

impl DataValidation {
    /// A single-select list rule.
    ///
    /// With `strict = true` out-of-list entries are rejected; otherwise the host
    /// only warns.
    pub fn list<I, S>(values: I, strict: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().replace('"', "\"\""))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            kind: DataValidationKind::List,
            formula1: format!("\"{joined}\""),
            allow_blank: true,
            show_error_message: true,
            show_drop_down: true,
            error_style: if strict {
                DataValidationErrorStyle::Stop
            } else {
                DataValidationErrorStyle::Warning
            },
        }
    }

    /// True if out-of-list entries are rejected rather than warned about.
    pub fn is_strict(&self) -> bool {
        self.show_error_message && self.error_style == DataValidationErrorStyle::Stop
    }

    /// The allowed values of a list rule given as a literal.
    ///
    /// Returns `None` when `formula1` is not a quoted literal (e.g. a range
    /// reference), which this model does not resolve.
    pub fn list_values(&self) -> Option<Vec<String>> {
        let trimmed = self.formula1.trim();
        let inner = trimmed.strip_prefix('"')?.strip_suffix('"')?;
        Some(
            inner
                .split(',')
                .map(|v| v.replace("\"\"", "\""))
                .collect(),
        )
    }
}

/// A validation rule applied to one or more ranges of a worksheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataValidationAssignment {
    pub ranges: Vec<Range>,
    pub validation: DataValidation,
}

impl DataValidationAssignment {
    pub fn applies_to(&self, cell: CellRef) -> bool {
        self.ranges.iter().any(|r| r.contains(cell))
    }
}

/// Why a candidate value failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataValidationErrorKind {
    Blank,
    NotInList,
    UnresolvedList,
}

/// Result of validating a candidate value against a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataValidationResult {
    pub ok: bool,
    pub error: Option<DataValidationErrorKind>,
}

impl DataValidationResult {
    fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn fail(kind: DataValidationErrorKind) -> Self {
        Self {
            ok: false,
            error: Some(kind),
        }
    }
}

/// Decide whether `candidate` satisfies `validation`.
///
/// List matching compares the displayed text exactly (case-sensitive, after
/// trimming the candidate), so `12` matches a list entry `"12"`.
pub fn validate_value(validation: &DataValidation, candidate: &CellValue) -> DataValidationResult {
    if candidate.is_empty() {
        return if validation.allow_blank {
            DataValidationResult::ok()
        } else {
            DataValidationResult::fail(DataValidationErrorKind::Blank)
        };
    }

    match validation.kind {
        DataValidationKind::List => {
            let Some(values) = validation.list_values() else {
                return DataValidationResult::fail(DataValidationErrorKind::UnresolvedList);
            };
            let text = candidate.to_string();
            let text = text.trim();
            if values.iter().any(|v| v == text) {
                DataValidationResult::ok()
            } else {
                DataValidationResult::fail(DataValidationErrorKind::NotInList)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_builds_quoted_literal() {
        let dv = DataValidation::list(["OK", "Bug"], true);
        assert_eq!(dv.formula1, "\"OK,Bug\"");
        assert_eq!(
            dv.list_values(),
            Some(vec!["OK".to_string(), "Bug".to_string()])
        );
        assert!(dv.is_strict());
        assert!(!DataValidation::list(["OK"], false).is_strict());
    }

    #[test]
    fn embedded_quotes_survive() {
        let dv = DataValidation::list(["say \"hi\""], true);
        assert_eq!(dv.list_values(), Some(vec!["say \"hi\"".to_string()]));
    }

    #[test]
    fn range_references_are_unresolved() {
        let mut dv = DataValidation::list(["OK"], true);
        dv.formula1 = "$A$1:$A$4".to_string();
        assert_eq!(dv.list_values(), None);
        let result = validate_value(&dv, &CellValue::from("OK"));
        assert_eq!(result.error, Some(DataValidationErrorKind::UnresolvedList));
    }

    #[test]
    fn blank_respects_allow_blank() {
        let mut dv = DataValidation::list(["OK"], true);
        assert!(validate_value(&dv, &CellValue::Empty).ok);
        dv.allow_blank = false;
        assert_eq!(
            validate_value(&dv, &CellValue::Empty).error,
            Some(DataValidationErrorKind::Blank)
        );
    }
}
