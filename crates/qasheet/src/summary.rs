use qasheet_catalog::{Catalog, Labels};
use qasheet_model::{CellRef, CellValue, FontWeight, Range};

use crate::document::{block, padded_row, prepare_sheet, row_span, Spreadsheet, SpreadsheetError};
use crate::{SheetReport, HEADER_FILL};

pub const SUMMARY_COLUMNS: u32 = 6;

/// Row of the column headers (0-based); the per-section rows follow it.
const HEADER_ROW: usize = 5;

/// Write the summary sheet as the first tab: title, tester metadata labels,
/// one row per section with its declared total, and the grand total.
pub fn create_summary_sheet<S: Spreadsheet + ?Sized>(
    doc: &mut S,
    catalog: &Catalog,
    labels: &Labels,
) -> Result<SheetReport, SpreadsheetError> {
    let sheet = prepare_sheet(doc, labels.summary_sheet, Some(0))?;

    let mut rows = vec![
        padded_row([labels.summary_title], SUMMARY_COLUMNS),
        padded_row(Vec::<CellValue>::new(), SUMMARY_COLUMNS),
        padded_row([labels.date, "", labels.tester], SUMMARY_COLUMNS),
        padded_row([labels.bot_version, "", labels.device], SUMMARY_COLUMNS),
        padded_row(Vec::<CellValue>::new(), SUMMARY_COLUMNS),
        padded_row(labels.summary_headers, SUMMARY_COLUMNS),
    ];
    for (idx, section) in catalog.sections.iter().enumerate() {
        rows.push(padded_row(
            [
                CellValue::from(labels.section_sheet_name(idx, &section.name)),
                CellValue::from(section.total),
            ],
            SUMMARY_COLUMNS,
        ));
    }
    let total_row = rows.len();
    rows.push(padded_row(
        [CellValue::from(labels.total_row), CellValue::from(catalog.total)],
        SUMMARY_COLUMNS,
    ));

    let row_count = rows.len();
    doc.set_values(sheet, block(row_count, SUMMARY_COLUMNS)?, rows)?;

    let title = Range::new(CellRef::new(0, 0), CellRef::new(0, 0));
    doc.set_font_weight(sheet, title, FontWeight::Bold)?;
    for row in [HEADER_ROW, total_row] {
        let span = row_span(row, SUMMARY_COLUMNS)?;
        doc.set_font_weight(sheet, span, FontWeight::Bold)?;
        doc.set_background(sheet, span, HEADER_FILL)?;
    }

    log::info!(
        "wrote summary sheet `{}` ({} section(s))",
        labels.summary_sheet,
        catalog.sections.len()
    );
    Ok(SheetReport {
        name: labels.summary_sheet.to_string(),
        rows: row_count,
    })
}
