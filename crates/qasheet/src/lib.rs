//! Generator for the manual QA tracking workbook.
//!
//! [`create_testing_spreadsheet`] drives three builders against any
//! [`Spreadsheet`]:
//!
//! - [`create_summary_sheet`]: the "Summary" tab with declared totals per
//!   section,
//! - [`create_scenario_sheets`]: one tab per catalog section with a status
//!   dropdown,
//! - [`create_bugs_sheet`]: the "Bugs" tab with placeholder ids.
//!
//! The `qasheet` binary wires these to an `.xlsx` file on disk.

use qasheet_model::Color;

pub mod bugs;
pub mod cli;
pub mod document;
mod run;
pub mod scenarios;
pub mod summary;

pub use bugs::create_bugs_sheet;
pub use document::{prepare_sheet, SheetHandle, Spreadsheet, SpreadsheetError};
pub use run::{create_testing_spreadsheet, Notifier, RunReport, SheetReport};
pub use scenarios::create_scenario_sheets;
pub use summary::create_summary_sheet;

/// Shade of header, title and total rows.
pub const HEADER_FILL: Color = Color::rgb(0xD9D9D9);
