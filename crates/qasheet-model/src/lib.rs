//! `qasheet-model` defines the in-memory workbook the QA tracking generator
//! writes into.
//!
//! The model is the reference implementation of the spreadsheet capability
//! surface: it is what the builders run against in tests, and what the `.xlsx`
//! layer loads from and saves to. It is `serde`-friendly so a workbook can be
//! dumped as JSON for inspection.

mod address;
mod cell;
mod data_validation;
mod error;
mod sheet_name;
mod style;
mod value;
mod workbook;
mod worksheet;

pub use address::{
    format_sqref, parse_sqref, A1ParseError, CellRef, Range, RangeParseError,
};
pub use cell::{Cell, CellKey, EXCEL_MAX_COLS, EXCEL_MAX_ROWS};
pub use data_validation::{
    validate_value, DataValidation, DataValidationAssignment, DataValidationErrorKind,
    DataValidationErrorStyle, DataValidationKind, DataValidationResult,
};
pub use error::WorkbookError;
pub use sheet_name::{
    sheet_name_casefold, sheet_name_eq_case_insensitive, validate_sheet_name, SheetNameError,
    EXCEL_MAX_SHEET_NAME_LEN,
};
pub use style::{Color, ColorParseError, Fill, Font, FontWeight, Style, StyleTable};
pub use value::CellValue;
pub use workbook::Workbook;
pub use worksheet::{Worksheet, WorksheetId};

/// Current serialization schema version, embedded into [`Workbook`].
pub const SCHEMA_VERSION: u32 = 1;
