use qasheet_catalog::{Catalog, Labels};
use serde::Serialize;

use crate::bugs::create_bugs_sheet;
use crate::document::{Spreadsheet, SpreadsheetError};
use crate::scenarios::create_scenario_sheets;
use crate::summary::create_summary_sheet;

/// Where the completion message goes once every sheet is written.
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// One sheet written by a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    pub name: String,
    /// Rows written, headers included.
    pub rows: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub summary: SheetReport,
    pub scenarios: Vec<SheetReport>,
    pub bugs: SheetReport,
}

impl RunReport {
    /// Every written sheet in tab order.
    pub fn sheets(&self) -> impl Iterator<Item = &SheetReport> {
        std::iter::once(&self.summary)
            .chain(&self.scenarios)
            .chain(std::iter::once(&self.bugs))
    }
}

/// Build the whole tracking workbook: summary, one sheet per catalog section,
/// bug list, then notify.
///
/// Every sheet is cleared before it is written, so running this again over
/// its own output yields the same workbook. A failure stops the run where it
/// happened; sheets written before it are kept.
pub fn create_testing_spreadsheet<S, N>(
    doc: &mut S,
    catalog: &Catalog,
    labels: &Labels,
    notifier: &mut N,
) -> Result<RunReport, SpreadsheetError>
where
    S: Spreadsheet + ?Sized,
    N: Notifier + ?Sized,
{
    let summary = create_summary_sheet(doc, catalog, labels)?;
    let scenarios = create_scenario_sheets(doc, catalog, labels)?;
    let bugs = create_bugs_sheet(doc, labels)?;

    notifier.alert(labels.completed);
    Ok(RunReport {
        summary,
        scenarios,
        bugs,
    })
}
