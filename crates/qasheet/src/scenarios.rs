use qasheet_catalog::{Catalog, Labels, Scenario};
use qasheet_model::{CellRef, CellValue, DataValidation, FontWeight, Range};

use crate::document::{block, padded_row, prepare_sheet, row_span, Spreadsheet, SpreadsheetError};
use crate::{SheetReport, HEADER_FILL};

pub const SCENARIO_COLUMNS: u32 = 7;

/// Column of the tester-maintained status dropdown (F).
pub const STATUS_COLUMN: u32 = 5;

/// Rows above the first scenario: the section heading and the column headers.
pub const SCENARIO_HEADER_ROWS: usize = 2;

/// The fixed 7-column projection of one scenario; status and comment start
/// empty.
pub fn scenario_row(scenario: &Scenario) -> Vec<CellValue> {
    vec![
        CellValue::from(scenario.id.as_str()),
        CellValue::from(scenario.marker()),
        CellValue::from(scenario.name.as_str()),
        CellValue::from(scenario.preconditions_or_placeholder()),
        CellValue::from(scenario.expected.as_str()),
        CellValue::Empty,
        CellValue::Empty,
    ]
}

/// Write one sheet per catalog section, in catalog order, each appended
/// after the existing tabs (or cleared and rewritten in place).
///
/// The first failing section aborts the rest.
pub fn create_scenario_sheets<S: Spreadsheet + ?Sized>(
    doc: &mut S,
    catalog: &Catalog,
    labels: &Labels,
) -> Result<Vec<SheetReport>, SpreadsheetError> {
    let mut reports = Vec::with_capacity(catalog.sections.len());

    for (idx, section) in catalog.sections.iter().enumerate() {
        let name = labels.section_sheet_name(idx, &section.name);
        let sheet = prepare_sheet(doc, &name, None)?;

        let mut rows = Vec::with_capacity(section.scenarios.len() + SCENARIO_HEADER_ROWS);
        rows.push(padded_row(
            [labels.section_heading(idx, &section.name)],
            SCENARIO_COLUMNS,
        ));
        rows.push(padded_row(labels.scenario_headers, SCENARIO_COLUMNS));
        rows.extend(section.scenarios.iter().map(scenario_row));

        let row_count = rows.len();
        doc.set_values(sheet, block(row_count, SCENARIO_COLUMNS)?, rows)?;

        for row in 0..SCENARIO_HEADER_ROWS {
            let span = row_span(row, SCENARIO_COLUMNS)?;
            doc.set_font_weight(sheet, span, FontWeight::Bold)?;
            doc.set_background(sheet, span, HEADER_FILL)?;
        }

        if let Some(status) = status_range(section.scenarios.len()) {
            doc.set_data_validation(sheet, status, DataValidation::list(labels.statuses, true))?;
        } else {
            log::warn!("section `{name}` has no scenarios; skipping status validation");
        }

        log::debug!("wrote `{name}` with {} scenario(s)", section.scenarios.len());
        reports.push(SheetReport { name, rows: row_count });
    }

    log::info!("wrote {} scenario sheet(s)", reports.len());
    Ok(reports)
}

/// The status cells of `scenarios` data rows, `None` when there are none.
pub fn status_range(scenarios: usize) -> Option<Range> {
    let rows = u32::try_from(scenarios).ok()?;
    Range::from_origin(
        CellRef::new(SCENARIO_HEADER_ROWS as u32, STATUS_COLUMN),
        rows,
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_range_covers_exactly_the_data_rows() {
        assert_eq!(status_range(12).unwrap().to_string(), "F3:F14");
        assert_eq!(status_range(1).unwrap().to_string(), "F3");
        assert_eq!(status_range(0), None);
    }

    #[test]
    fn scenario_row_projects_seven_columns() {
        let scenario = Scenario {
            id: "2.13".to_string(),
            name: "Question to the AI (?)".to_string(),
            critical: true,
            preconditions: None,
            expected: "Consultation".to_string(),
        };
        assert_eq!(
            scenario_row(&scenario),
            vec![
                CellValue::from("2.13"),
                CellValue::from("🔥"),
                CellValue::from("Question to the AI (?)"),
                CellValue::from("—"),
                CellValue::from("Consultation"),
                CellValue::Empty,
                CellValue::Empty,
            ]
        );
    }
}
