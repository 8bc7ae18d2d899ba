use crate::{CellRef, Range, SheetNameError, WorksheetId};

/// Errors raised by workbook and worksheet mutations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WorkbookError {
    #[error("sheet not found: {0}")]
    SheetNotFound(WorksheetId),
    #[error("invalid sheet name `{name}`: {source}")]
    InvalidSheetName {
        name: String,
        #[source]
        source: SheetNameError,
    },
    #[error("range {0} exceeds the worksheet bounds")]
    RangeOutOfBounds(Range),
    #[error("value grid is {rows}x{cols} but range {range} is {expected_rows}x{expected_cols}")]
    ValueShape {
        range: Range,
        expected_rows: u32,
        expected_cols: u32,
        rows: usize,
        cols: usize,
    },
    #[error("unknown style id {0}")]
    UnknownStyle(u32),
    #[error("value `{value}` at {cell} rejected by data validation")]
    ValidationRejected { cell: CellRef, value: String },
}
