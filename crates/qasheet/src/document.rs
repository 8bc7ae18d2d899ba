//! The spreadsheet capability surface the builders write through.
//!
//! Builders only ever see a `&mut impl Spreadsheet`; the in-memory
//! [`Workbook`] is the shipped implementation.

use qasheet_model::{
    CellRef, CellValue, Color, DataValidation, FontWeight, Range, Workbook, WorkbookError,
    WorksheetId,
};

/// Opaque reference to a sheet of a [`Spreadsheet`].
pub type SheetHandle = WorksheetId;

#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),
    #[error("block of {rows} row(s) x {cols} column(s) cannot be addressed")]
    InvalidBlock { rows: usize, cols: u32 },
    /// Failure reported by a non-workbook backend.
    #[error("spreadsheet backend error: {0}")]
    Backend(String),
}

pub trait Spreadsheet {
    /// Look a sheet up by name (case-insensitive).
    fn sheet_by_name(&self, name: &str) -> Option<SheetHandle>;

    /// Create a sheet at tab `position`, or after the last sheet when `None`.
    fn insert_sheet(
        &mut self,
        name: &str,
        position: Option<usize>,
    ) -> Result<SheetHandle, SpreadsheetError>;

    /// Remove every value, format and validation rule from a sheet.
    fn clear(&mut self, sheet: SheetHandle) -> Result<(), SpreadsheetError>;

    /// Bulk write; `values` must match the shape of `range`.
    fn set_values(
        &mut self,
        sheet: SheetHandle,
        range: Range,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), SpreadsheetError>;

    fn set_font_weight(
        &mut self,
        sheet: SheetHandle,
        range: Range,
        weight: FontWeight,
    ) -> Result<(), SpreadsheetError>;

    fn set_background(
        &mut self,
        sheet: SheetHandle,
        range: Range,
        color: Color,
    ) -> Result<(), SpreadsheetError>;

    fn set_data_validation(
        &mut self,
        sheet: SheetHandle,
        range: Range,
        rule: DataValidation,
    ) -> Result<(), SpreadsheetError>;
}

impl Spreadsheet for Workbook {
    fn sheet_by_name(&self, name: &str) -> Option<SheetHandle> {
        Workbook::sheet_by_name(self, name).map(|sheet| sheet.id)
    }

    fn insert_sheet(
        &mut self,
        name: &str,
        position: Option<usize>,
    ) -> Result<SheetHandle, SpreadsheetError> {
        let id = match position {
            Some(index) => Workbook::insert_sheet(self, name, index)?,
            None => self.add_sheet(name)?,
        };
        Ok(id)
    }

    fn clear(&mut self, sheet: SheetHandle) -> Result<(), SpreadsheetError> {
        Ok(self.clear_sheet(sheet)?)
    }

    fn set_values(
        &mut self,
        sheet: SheetHandle,
        range: Range,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), SpreadsheetError> {
        Ok(Workbook::set_values(self, sheet, range, values)?)
    }

    fn set_font_weight(
        &mut self,
        sheet: SheetHandle,
        range: Range,
        weight: FontWeight,
    ) -> Result<(), SpreadsheetError> {
        Ok(Workbook::set_font_weight(self, sheet, range, weight)?)
    }

    fn set_background(
        &mut self,
        sheet: SheetHandle,
        range: Range,
        color: Color,
    ) -> Result<(), SpreadsheetError> {
        Ok(Workbook::set_background(self, sheet, range, Some(color))?)
    }

    fn set_data_validation(
        &mut self,
        sheet: SheetHandle,
        range: Range,
        rule: DataValidation,
    ) -> Result<(), SpreadsheetError> {
        Ok(Workbook::set_data_validation(self, sheet, range, rule)?)
    }
}

/// Return the sheet called `name`, cleared, creating it at `position` when it
/// does not exist yet.
pub fn prepare_sheet<S: Spreadsheet + ?Sized>(
    doc: &mut S,
    name: &str,
    position: Option<usize>,
) -> Result<SheetHandle, SpreadsheetError> {
    match doc.sheet_by_name(name) {
        Some(sheet) => {
            log::debug!("clearing existing sheet `{name}`");
            doc.clear(sheet)?;
            Ok(sheet)
        }
        None => doc.insert_sheet(name, position),
    }
}

/// The `rows` x `cols` block anchored at A1.
pub(crate) fn block(rows: usize, cols: u32) -> Result<Range, SpreadsheetError> {
    u32::try_from(rows)
        .ok()
        .and_then(|r| Range::from_origin(CellRef::new(0, 0), r, cols))
        .ok_or(SpreadsheetError::InvalidBlock { rows, cols })
}

/// Columns `0..cols` of the 0-based `row`.
pub(crate) fn row_span(row: usize, cols: u32) -> Result<Range, SpreadsheetError> {
    u32::try_from(row)
        .ok()
        .and_then(|r| Range::row_span(r, cols))
        .ok_or(SpreadsheetError::InvalidBlock { rows: 1, cols })
}

/// Pad `cells` with empty values up to `width` columns.
pub(crate) fn padded_row<I>(cells: I, width: u32) -> Vec<CellValue>
where
    I: IntoIterator,
    I::Item: Into<CellValue>,
{
    let mut row: Vec<CellValue> = cells.into_iter().map(Into::into).collect();
    row.resize(width as usize, CellValue::Empty);
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_sheet_creates_then_clears() {
        let mut wb = Workbook::new();
        wb.add_sheet("Other").unwrap();

        let id = prepare_sheet(&mut wb, "Summary", Some(0)).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Summary", "Other"]);
        wb.sheet_mut(id)
            .unwrap()
            .set_value(CellRef::new(3, 3), "stale")
            .unwrap();

        // Lookup ignores case; the existing sheet is reused and emptied.
        let again = prepare_sheet(&mut wb, "SUMMARY", Some(0)).unwrap();
        assert_eq!(again, id);
        assert_eq!(wb.sheet_names(), vec!["Summary", "Other"]);
        assert_eq!(wb.sheet(id).unwrap().used_range(), None);
    }

    #[test]
    fn padded_row_fills_to_width() {
        assert_eq!(
            padded_row(["a", "b"], 4),
            vec![
                CellValue::from("a"),
                CellValue::from("b"),
                CellValue::Empty,
                CellValue::Empty
            ]
        );
    }

    #[test]
    fn empty_block_is_rejected() {
        assert!(matches!(
            block(0, 7),
            Err(SpreadsheetError::InvalidBlock { rows: 0, cols: 7 })
        ));
        assert_eq!(block(14, 7).unwrap().to_string(), "A1:G14");
    }
}
