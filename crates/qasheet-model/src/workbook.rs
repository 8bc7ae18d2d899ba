use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    sheet_name_eq_case_insensitive, validate_sheet_name, CellRef, CellValue, Color,
    DataValidation, FontWeight, Range, SheetNameError, Style, StyleTable, WorkbookError,
    Worksheet, WorksheetId,
};

fn default_schema_version() -> u32 {
    crate::SCHEMA_VERSION
}

/// A workbook containing worksheets (in tab order) and a shared style table.
#[derive(Clone, Debug, Serialize)]
pub struct Workbook {
    /// Serialization schema version.
    pub schema_version: u32,

    /// Worksheets in tab order.
    pub sheets: Vec<Worksheet>,

    /// Workbook style table (deduplicated).
    pub styles: StyleTable,

    /// Next worksheet id to allocate (runtime-only).
    #[serde(skip)]
    next_sheet_id: WorksheetId,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    /// Create a new empty workbook.
    pub fn new() -> Self {
        Self {
            schema_version: crate::SCHEMA_VERSION,
            sheets: Vec::new(),
            styles: StyleTable::new(),
            next_sheet_id: 1,
        }
    }

    /// Append a worksheet, returning its id.
    pub fn add_sheet(&mut self, name: &str) -> Result<WorksheetId, WorkbookError> {
        self.insert_sheet(name, self.sheets.len())
    }

    /// Insert a worksheet at tab position `index` (clamped to the sheet count).
    pub fn insert_sheet(&mut self, name: &str, index: usize) -> Result<WorksheetId, WorkbookError> {
        let invalid = |source: SheetNameError| WorkbookError::InvalidSheetName {
            name: name.to_string(),
            source,
        };
        validate_sheet_name(name).map_err(invalid)?;
        if self.sheet_by_name(name).is_some() {
            return Err(invalid(SheetNameError::DuplicateName));
        }

        let id = self.next_sheet_id;
        self.next_sheet_id = self.next_sheet_id.wrapping_add(1);
        let index = index.min(self.sheets.len());
        self.sheets.insert(index, Worksheet::new(id, name));
        log::debug!("inserted sheet `{name}` (id {id}) at position {index}");
        Ok(id)
    }

    pub fn sheet(&self, id: WorksheetId) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn sheet_mut(&mut self, id: WorksheetId) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|s| s.id == id)
    }

    /// Find a sheet by name (case-insensitive).
    pub fn sheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheets
            .iter()
            .find(|s| sheet_name_eq_case_insensitive(&s.name, name))
    }

    /// Sheet names in tab order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    fn require_sheet_mut(&mut self, id: WorksheetId) -> Result<&mut Worksheet, WorkbookError> {
        self.sheet_mut(id).ok_or(WorkbookError::SheetNotFound(id))
    }

    /// Remove all content from a sheet, keeping the sheet and its position.
    pub fn clear_sheet(&mut self, id: WorksheetId) -> Result<(), WorkbookError> {
        self.require_sheet_mut(id)?.clear();
        Ok(())
    }

    pub fn set_values(
        &mut self,
        id: WorksheetId,
        range: Range,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), WorkbookError> {
        self.require_sheet_mut(id)?.set_values(range, values)
    }

    /// Style of a cell (the default style when unset).
    pub fn cell_style(&self, id: WorksheetId, cell: CellRef) -> Option<&Style> {
        let style_id = self.sheet(id)?.style_id(cell);
        self.styles.get(style_id)
    }

    pub fn set_font_weight(
        &mut self,
        id: WorksheetId,
        range: Range,
        weight: FontWeight,
    ) -> Result<(), WorkbookError> {
        self.restyle(id, range, |style| style.with_font_weight(weight))
    }

    pub fn set_background(
        &mut self,
        id: WorksheetId,
        range: Range,
        color: Option<Color>,
    ) -> Result<(), WorkbookError> {
        self.restyle(id, range, |style| style.with_background(color))
    }

    pub fn set_data_validation(
        &mut self,
        id: WorksheetId,
        range: Range,
        validation: DataValidation,
    ) -> Result<(), WorkbookError> {
        self.require_sheet_mut(id)?.set_data_validation(range, validation)
    }

    /// Point a cell at an existing entry of the style table.
    pub fn set_cell_style_id(
        &mut self,
        id: WorksheetId,
        cell: CellRef,
        style_id: u32,
    ) -> Result<(), WorkbookError> {
        if self.styles.get(style_id).is_none() {
            return Err(WorkbookError::UnknownStyle(style_id));
        }
        self.require_sheet_mut(id)?.set_style_id(cell, style_id)
    }

    /// Rewrite the style of every cell in `range` through `f`.
    fn restyle(
        &mut self,
        id: WorksheetId,
        range: Range,
        f: impl Fn(&Style) -> Style,
    ) -> Result<(), WorkbookError> {
        let sheet_index = self
            .sheets
            .iter()
            .position(|s| s.id == id)
            .ok_or(WorkbookError::SheetNotFound(id))?;

        for cell in range.cells() {
            let current_id = self.sheets[sheet_index].style_id(cell);
            let current = self.styles.get(current_id).cloned().unwrap_or_default();
            let new_id = self.styles.intern(f(&current));
            if new_id != current_id {
                self.sheets[sheet_index].set_style_id(cell, new_id)?;
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Workbook {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            #[serde(default = "default_schema_version")]
            schema_version: u32,
            #[serde(default)]
            sheets: Vec<Worksheet>,
            #[serde(default)]
            styles: StyleTable,
        }

        let helper = Helper::deserialize(deserializer)?;
        for (i, sheet) in helper.sheets.iter().enumerate() {
            validate_sheet_name(&sheet.name).map_err(D::Error::custom)?;
            let duplicate = helper.sheets[..i].iter().any(|other| {
                other.id == sheet.id || sheet_name_eq_case_insensitive(&other.name, &sheet.name)
            });
            if duplicate {
                return Err(D::Error::custom(format!(
                    "duplicate sheet `{}` (id {})",
                    sheet.name, sheet.id
                )));
            }
        }

        let next_sheet_id = helper
            .sheets
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            .wrapping_add(1);

        Ok(Workbook {
            schema_version: helper.schema_version,
            sheets: helper.sheets,
            styles: helper.styles,
            next_sheet_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_sheet_honours_position_and_rejects_duplicates() {
        let mut wb = Workbook::new();
        let a = wb.add_sheet("1. Registration").unwrap();
        let summary = wb.insert_sheet("Summary", 0).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Summary", "1. Registration"]);
        assert_ne!(a, summary);

        let err = wb.add_sheet("SUMMARY").unwrap_err();
        assert_eq!(
            err,
            WorkbookError::InvalidSheetName {
                name: "SUMMARY".to_string(),
                source: SheetNameError::DuplicateName
            }
        );
        assert_eq!(wb.sheet_by_name("summary").map(|s| s.id), Some(summary));
    }

    #[test]
    fn formatting_interns_styles() {
        let mut wb = Workbook::new();
        let id = wb.add_sheet("Sheet").unwrap();
        let header = Range::from_a1("A2:C2").unwrap();
        wb.set_font_weight(id, header, FontWeight::Bold).unwrap();
        wb.set_background(id, header, Some(Color::rgb(0xD9D9D9))).unwrap();

        // default, bold, bold+fill
        assert_eq!(wb.styles.len(), 3);
        let style = wb.cell_style(id, CellRef::new(1, 2)).unwrap();
        assert!(style.is_bold());
        assert_eq!(style.background(), Some(Color::rgb(0xD9D9D9)));
        assert_eq!(wb.cell_style(id, CellRef::new(0, 0)), Some(&Style::default()));
    }

    #[test]
    fn unknown_sheet_is_an_error() {
        let mut wb = Workbook::new();
        assert_eq!(wb.clear_sheet(42), Err(WorkbookError::SheetNotFound(42)));
    }

    #[test]
    fn json_roundtrip_restores_id_allocation() {
        let mut wb = Workbook::new();
        let id = wb.add_sheet("Bugs").unwrap();
        wb.set_values(
            id,
            Range::from_a1("A1").unwrap(),
            vec![vec![CellValue::from("BUG-001")]],
        )
        .unwrap();

        let json = serde_json::to_string(&wb).unwrap();
        let mut back: Workbook = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.sheet(id).unwrap().value(CellRef::new(0, 0)),
            CellValue::from("BUG-001")
        );
        let next = back.add_sheet("Other").unwrap();
        assert!(next > id);
    }

    #[test]
    fn deserialize_rejects_duplicate_names() {
        let json = r#"{"sheets":[{"id":1,"name":"A"},{"id":2,"name":"a"}]}"#;
        assert!(serde_json::from_str::<Workbook>(json).is_err());
    }
}
