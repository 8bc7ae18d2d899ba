use qasheet_catalog::Labels;
use qasheet_model::{Color, FontWeight};

use crate::document::{block, padded_row, prepare_sheet, row_span, Spreadsheet, SpreadsheetError};
use crate::SheetReport;

pub const BUG_COLUMNS: u32 = 8;

/// Ids pre-filled in the first column of the bug list.
pub const PLACEHOLDER_BUG_IDS: [&str; 3] = ["BUG-001", "BUG-002", "BUG-003"];

/// Attention color of the bug list's title and header rows.
pub const BUG_FILL: Color = Color::rgb(0xF4CCCC);

pub fn create_bugs_sheet<S: Spreadsheet + ?Sized>(
    doc: &mut S,
    labels: &Labels,
) -> Result<SheetReport, SpreadsheetError> {
    let sheet = prepare_sheet(doc, labels.bugs_sheet, None)?;

    let mut rows = vec![
        padded_row([labels.bugs_title], BUG_COLUMNS),
        padded_row(labels.bug_headers, BUG_COLUMNS),
    ];
    rows.extend(PLACEHOLDER_BUG_IDS.iter().map(|id| padded_row([*id], BUG_COLUMNS)));

    let row_count = rows.len();
    doc.set_values(sheet, block(row_count, BUG_COLUMNS)?, rows)?;
    for row in 0..2 {
        let span = row_span(row, BUG_COLUMNS)?;
        doc.set_font_weight(sheet, span, FontWeight::Bold)?;
        doc.set_background(sheet, span, BUG_FILL)?;
    }

    log::info!("wrote bug sheet `{}`", labels.bugs_sheet);
    Ok(SheetReport {
        name: labels.bugs_sheet.to_string(),
        rows: row_count,
    })
}
