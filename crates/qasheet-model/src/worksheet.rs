use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cell::{EXCEL_MAX_COLS, EXCEL_MAX_ROWS};
use crate::{
    validate_value, Cell, CellKey, CellRef, CellValue, DataValidation, DataValidationAssignment,
    Range, WorkbookError,
};

/// Identifier for a worksheet within its workbook.
pub type WorksheetId = u32;

/// A worksheet: a sparse grid of cells plus the validation rules applied to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: WorksheetId,
    pub name: String,
    /// Sparse cell storage, ordered row-major.
    #[serde(default)]
    cells: BTreeMap<CellKey, Cell>,
    /// Validation rules, in the order they were applied. Later rules win.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_validations: Vec<DataValidationAssignment>,
}

impl Worksheet {
    pub fn new(id: WorksheetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cells: BTreeMap::new(),
            data_validations: Vec::new(),
        }
    }

    pub fn cell(&self, cell: CellRef) -> Option<&Cell> {
        self.cells.get(&CellKey::from_ref(cell)?)
    }

    /// The value at `cell` ([`CellValue::Empty`] when unset).
    pub fn value(&self, cell: CellRef) -> CellValue {
        self.cell(cell).map(|c| c.value.clone()).unwrap_or_default()
    }

    pub fn value_a1(&self, a1: &str) -> Option<CellValue> {
        CellRef::from_a1(a1).ok().map(|c| self.value(c))
    }

    pub fn style_id(&self, cell: CellRef) -> u32 {
        self.cell(cell).map(|c| c.style_id).unwrap_or(0)
    }

    /// Iterate over stored cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.cells.iter().map(|(k, c)| (k.to_ref(), c))
    }

    /// Write a value, keeping the cell's style. A formula in the cell is
    /// replaced by the literal. No validation is applied.
    pub fn set_value(&mut self, cell: CellRef, value: impl Into<CellValue>) -> Result<(), WorkbookError> {
        let key = key_for(cell)?;
        let value = value.into().normalized();
        let entry = self.cells.entry(key).or_default();
        entry.value = value;
        entry.formula = None;
        if entry.is_truly_empty() {
            self.cells.remove(&key);
        }
        Ok(())
    }

    /// The formula at `cell`, without the leading `=`.
    pub fn formula(&self, cell: CellRef) -> Option<&str> {
        self.cell(cell)?.formula.as_deref()
    }

    /// Store `formula` together with its last computed value, keeping the
    /// cell's style.
    pub fn set_formula(
        &mut self,
        cell: CellRef,
        formula: impl Into<String>,
        cached: impl Into<CellValue>,
    ) -> Result<(), WorkbookError> {
        let key = key_for(cell)?;
        let formula = formula.into();
        let formula = formula.strip_prefix('=').unwrap_or(&formula).to_string();
        let entry = self.cells.entry(key).or_default();
        entry.value = cached.into().normalized();
        entry.formula = (!formula.trim().is_empty()).then_some(formula);
        if entry.is_truly_empty() {
            self.cells.remove(&key);
        }
        Ok(())
    }

    /// Bulk write: `values` must have exactly `range.height()` rows of
    /// `range.width()` values each.
    pub fn set_values(&mut self, range: Range, values: Vec<Vec<CellValue>>) -> Result<(), WorkbookError> {
        check_bounds(range)?;
        let cols = values.first().map_or(0, Vec::len);
        let shape_ok = values.len() == range.height() as usize
            && values.iter().all(|row| row.len() == range.width() as usize);
        if !shape_ok {
            return Err(WorkbookError::ValueShape {
                range,
                expected_rows: range.height(),
                expected_cols: range.width(),
                rows: values.len(),
                cols,
            });
        }

        for (r, row) in values.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                let cell = CellRef::new(range.start.row + r as u32, range.start.col + c as u32);
                self.set_value(cell, value)?;
            }
        }
        Ok(())
    }

    pub(crate) fn set_style_id(&mut self, cell: CellRef, style_id: u32) -> Result<(), WorkbookError> {
        let key = key_for(cell)?;
        let entry = self.cells.entry(key).or_default();
        entry.style_id = style_id;
        if entry.is_truly_empty() {
            self.cells.remove(&key);
        }
        Ok(())
    }

    /// Remove all content: values, formatting and validation rules.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.data_validations.clear();
    }

    /// Smallest range covering every non-empty value or formula.
    pub fn used_range(&self) -> Option<Range> {
        let mut cells = self
            .cells
            .iter()
            .filter(|(_, c)| !c.value.is_empty() || c.formula.is_some())
            .map(|(k, _)| k.to_ref());
        let first = cells.next()?;
        let (mut min_row, mut max_row, mut min_col, mut max_col) =
            (first.row, first.row, first.col, first.col);
        for cell in cells {
            min_row = min_row.min(cell.row);
            max_row = max_row.max(cell.row);
            min_col = min_col.min(cell.col);
            max_col = max_col.max(cell.col);
        }
        Some(Range::new(
            CellRef::new(min_row, min_col),
            CellRef::new(max_row, max_col),
        ))
    }

    /// Number of rows up to and including the last row holding a value.
    pub fn last_row(&self) -> u32 {
        self.used_range().map_or(0, |r| r.end.row + 1)
    }

    /// Values of row `row` for columns `0..cols`.
    pub fn row_values(&self, row: u32, cols: u32) -> Vec<CellValue> {
        (0..cols).map(|col| self.value(CellRef::new(row, col))).collect()
    }

    /// Apply `validation` to `range`, replacing rules fully covered by it.
    ///
    /// Rules that only partially overlap `range` are kept; lookups prefer the
    /// most recently applied rule.
    pub fn set_data_validation(&mut self, range: Range, validation: DataValidation) -> Result<(), WorkbookError> {
        check_bounds(range)?;
        for assignment in &mut self.data_validations {
            assignment.ranges.retain(|r| !range.contains_range(r));
        }
        self.data_validations.retain(|a| !a.ranges.is_empty());
        self.data_validations.push(DataValidationAssignment {
            ranges: vec![range],
            validation,
        });
        Ok(())
    }

    /// The rule in effect at `cell`, if any.
    pub fn data_validation_at(&self, cell: CellRef) -> Option<&DataValidation> {
        self.data_validations
            .iter()
            .rev()
            .find(|a| a.applies_to(cell))
            .map(|a| &a.validation)
    }

    /// Enter a value the way a person typing into the sheet would.
    ///
    /// Strict rules reject out-of-list entries; lenient rules accept them with
    /// a warning.
    pub fn enter_value(&mut self, cell: CellRef, value: impl Into<CellValue>) -> Result<(), WorkbookError> {
        let value = value.into().normalized();
        if let Some(rule) = self.data_validation_at(cell) {
            let result = validate_value(rule, &value);
            if !result.ok {
                if rule.is_strict() {
                    return Err(WorkbookError::ValidationRejected {
                        cell,
                        value: value.to_string(),
                    });
                }
                log::warn!(
                    "sheet `{}`: {cell} accepted `{value}` despite validation ({:?})",
                    self.name,
                    result.error
                );
            }
        }
        self.set_value(cell, value)
    }
}

fn key_for(cell: CellRef) -> Result<CellKey, WorkbookError> {
    CellKey::from_ref(cell).ok_or(WorkbookError::RangeOutOfBounds(Range::new(cell, cell)))
}

fn check_bounds(range: Range) -> Result<(), WorkbookError> {
    if range.end.row >= EXCEL_MAX_ROWS || range.end.col >= EXCEL_MAX_COLS {
        return Err(WorkbookError::RangeOutOfBounds(range));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(row: &[&str]) -> Vec<CellValue> {
        row.iter().map(|s| CellValue::from(*s)).collect()
    }

    #[test]
    fn set_values_requires_matching_shape() {
        let mut sheet = Worksheet::new(1, "Sheet");
        let range = Range::from_a1("A1:C1").unwrap();
        let err = sheet
            .set_values(range, vec![strings(&["a", "b"])])
            .unwrap_err();
        assert!(matches!(
            err,
            WorkbookError::ValueShape {
                expected_rows: 1,
                expected_cols: 3,
                rows: 1,
                cols: 2,
                ..
            }
        ));
        assert!(sheet.used_range().is_none());
    }

    #[test]
    fn empty_strings_are_not_stored() {
        let mut sheet = Worksheet::new(1, "Sheet");
        let range = Range::from_a1("A1:C2").unwrap();
        sheet
            .set_values(range, vec![strings(&["title", "", ""]), strings(&["a", "b", "c"])])
            .unwrap();
        assert_eq!(sheet.iter_cells().count(), 4);
        assert_eq!(sheet.used_range(), Some(range));
        assert_eq!(sheet.last_row(), 2);
    }

    #[test]
    fn clear_removes_everything() {
        let mut sheet = Worksheet::new(1, "Sheet");
        sheet.set_value(CellRef::new(0, 0), "x").unwrap();
        sheet
            .set_data_validation(
                Range::from_a1("B1:B3").unwrap(),
                DataValidation::list(["OK"], true),
            )
            .unwrap();
        sheet.clear();
        assert_eq!(sheet.iter_cells().count(), 0);
        assert!(sheet.data_validations.is_empty());
    }

    #[test]
    fn strict_rule_rejects_entries_outside_the_list() {
        let mut sheet = Worksheet::new(1, "Sheet");
        let status = Range::from_a1("F3:F5").unwrap();
        sheet
            .set_data_validation(status, DataValidation::list(["OK", "Bug"], true))
            .unwrap();

        let f3 = CellRef::from_a1("F3").unwrap();
        sheet.enter_value(f3, "OK").unwrap();
        assert_eq!(sheet.value(f3), CellValue::from("OK"));

        let err = sheet.enter_value(f3, "Maybe").unwrap_err();
        assert_eq!(
            err,
            WorkbookError::ValidationRejected {
                cell: f3,
                value: "Maybe".to_string()
            }
        );
        assert_eq!(sheet.value(f3), CellValue::from("OK"));

        // Outside the validated range anything goes.
        sheet.enter_value(CellRef::from_a1("F6").unwrap(), "Maybe").unwrap();
    }

    #[test]
    fn lenient_rule_accepts_entries_outside_the_list() {
        let mut sheet = Worksheet::new(1, "Sheet");
        sheet
            .set_data_validation(Range::from_a1("A1").unwrap(), DataValidation::list(["OK"], false))
            .unwrap();
        sheet.enter_value(CellRef::new(0, 0), "other").unwrap();
        assert_eq!(sheet.value(CellRef::new(0, 0)), CellValue::from("other"));
    }

    #[test]
    fn formulas_keep_their_cached_value_until_overwritten() {
        let mut sheet = Worksheet::new(1, "Notes");
        let a1 = CellRef::new(0, 0);
        sheet
            .set_formula(a1, "=COUNTIF('1. Registration'!F3:F14,\"OK\")", 4.0)
            .unwrap();
        assert_eq!(sheet.formula(a1), Some("COUNTIF('1. Registration'!F3:F14,\"OK\")"));
        assert_eq!(sheet.value(a1), CellValue::Number(4.0));

        // A formula with no cached result still occupies the cell.
        sheet.set_formula(CellRef::new(1, 0), "NOW()", CellValue::Empty).unwrap();
        assert_eq!(sheet.last_row(), 2);

        sheet.set_value(a1, "typed").unwrap();
        assert_eq!(sheet.formula(a1), None);
        assert_eq!(sheet.value(a1), CellValue::from("typed"));
    }

    #[test]
    fn later_rule_replaces_covered_rule() {
        let mut sheet = Worksheet::new(1, "Sheet");
        let range = Range::from_a1("F3:F5").unwrap();
        sheet
            .set_data_validation(range, DataValidation::list(["a"], true))
            .unwrap();
        sheet
            .set_data_validation(range, DataValidation::list(["b"], true))
            .unwrap();
        assert_eq!(sheet.data_validations.len(), 1);
        assert_eq!(
            sheet.data_validation_at(CellRef::new(3, 5)).unwrap().formula1,
            "\"b\""
        );
    }
}
