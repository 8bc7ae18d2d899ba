//! XLSX import/export for [`qasheet_model::Workbook`].
//!
//! - [`write_workbook`] produces deterministic `.xlsx` bytes: worksheets with
//!   inline strings, a `styles.xml` derived from the workbook style table and
//!   list data validations.
//! - [`read_workbook`] reads the same subset back (shared strings are accepted
//!   too), preserving style ids so an unchanged workbook re-serializes to the
//!   same bytes.
//! - [`save_workbook`]/[`load_workbook`] wrap both with atomic file IO.

mod error;
mod reader;
mod save;
mod styles;
mod writer;

pub use error::XlsxError;
pub use reader::read_workbook;
pub use save::{load_workbook, save_workbook};
pub use writer::write_workbook;
