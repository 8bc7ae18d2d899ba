use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use qasheet_model::{
    parse_sqref, CellRef, CellValue, DataValidation, DataValidationAssignment,
    DataValidationErrorStyle, DataValidationKind, Workbook, WorkbookError, WorksheetId,
};
use zip::ZipArchive;

use crate::styles::{child, children, parse_styles_xml};
use crate::XlsxError;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_TYPE_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_TYPE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_TYPE_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

/// Upper bound on the uncompressed size of a single part.
const MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

struct Relationship {
    kind: String,
    target: String,
}

/// Read a workbook from `.xlsx` bytes.
///
/// Only the subset the model carries is read: worksheets in tab order, cell
/// values, bold/italic fonts, solid fills and list validations. Other sheet
/// types (chart sheets, dialog sheets) are skipped.
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook, XlsxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let workbook_xml = read_part(&mut archive, WORKBOOK_PART)?
        .ok_or_else(|| XlsxError::MissingPart(WORKBOOK_PART.to_string()))?;
    let rels_xml = read_part(&mut archive, WORKBOOK_RELS_PART)?
        .ok_or_else(|| XlsxError::MissingPart(WORKBOOK_RELS_PART.to_string()))?;
    let rels = parse_relationships(&rels_xml)?;

    let mut workbook = Workbook::new();
    let mut style_mapping = Vec::new();
    if let Some(part) = part_for_type(&rels, REL_TYPE_STYLES) {
        if let Some(xml) = read_part(&mut archive, &part)? {
            // Interning in `cellXfs` order keeps `s` attributes aligned with
            // style ids, so re-saving an untouched workbook is byte-stable.
            for style in parse_styles_xml(&xml)? {
                style_mapping.push(workbook.styles.intern(style));
            }
        }
    }

    read_sheets(&mut archive, &workbook_xml, &rels, workbook, &style_mapping)
}

fn read_sheets<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    workbook_xml: &str,
    rels: &HashMap<String, Relationship>,
    mut workbook: Workbook,
    style_mapping: &[u32],
) -> Result<Workbook, XlsxError> {
    let shared_strings = match part_for_type(rels, REL_TYPE_SHARED_STRINGS) {
        Some(part) => match read_part(archive, &part)? {
            Some(xml) => parse_shared_strings(&xml)?,
            None => Vec::new(),
        },
        None => Vec::new(),
    };

    let doc = roxmltree::Document::parse(workbook_xml)?;
    let sheets = child(doc.root_element(), "sheets")
        .ok_or_else(|| XlsxError::Invalid("workbook.xml has no <sheets>".to_string()))?;

    for sheet in children(sheets, "sheet") {
        let name = sheet
            .attribute("name")
            .ok_or(XlsxError::MissingAttr("name"))?;
        let rel_id = sheet
            .attribute((REL_NS, "id"))
            .ok_or(XlsxError::MissingAttr("r:id"))?;
        let Some(rel) = rels.get(rel_id) else {
            return Err(XlsxError::Invalid(format!(
                "sheet `{name}` references unknown relationship {rel_id}"
            )));
        };
        if rel.kind != REL_TYPE_WORKSHEET {
            log::warn!("skipping non-worksheet sheet `{name}` ({})", rel.kind);
            continue;
        }

        let part = resolve_target(&rel.target);
        let xml = read_part(archive, &part)?.ok_or(XlsxError::MissingPart(part))?;
        let id = workbook.add_sheet(name)?;
        read_worksheet(&mut workbook, id, &xml, &shared_strings, style_mapping)?;
    }

    Ok(workbook)
}

fn read_worksheet(
    workbook: &mut Workbook,
    id: WorksheetId,
    xml: &str,
    shared_strings: &[String],
    style_mapping: &[u32],
) -> Result<(), XlsxError> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    if let Some(sheet_data) = child(root, "sheetData") {
        let mut next_row = 0u32;
        for row in children(sheet_data, "row") {
            let row_idx = match row.attribute("r") {
                Some(r) => r
                    .parse::<u32>()
                    .ok()
                    .and_then(|r| r.checked_sub(1))
                    .ok_or_else(|| XlsxError::Invalid(format!("invalid row number `{r}`")))?,
                None => next_row,
            };
            next_row = row_idx + 1;

            let mut next_col = 0u32;
            for c in children(row, "c") {
                let cell = match c.attribute("r") {
                    Some(a1) => CellRef::from_a1(a1)
                        .map_err(|e| XlsxError::Invalid(format!("cell `{a1}`: {e}")))?,
                    None => CellRef::new(row_idx, next_col),
                };
                next_col = cell.col + 1;

                let value = cell_value(c, shared_strings)?;
                let sheet = workbook
                    .sheet_mut(id)
                    .ok_or(WorkbookError::SheetNotFound(id))?;
                match cell_formula(c) {
                    Some(formula) => sheet.set_formula(cell, formula, value)?,
                    None if !value.is_empty() => sheet.set_value(cell, value)?,
                    None => {}
                }
                if let Some(s) = c.attribute("s") {
                    let xf: usize = s
                        .parse()
                        .map_err(|_| XlsxError::Invalid(format!("invalid style index `{s}`")))?;
                    let style_id = style_mapping.get(xf).copied().unwrap_or(0);
                    if style_id != 0 {
                        workbook.set_cell_style_id(id, cell, style_id)?;
                    }
                }
            }
        }
    }

    if let Some(validations) = child(root, "dataValidations") {
        let Some(sheet) = workbook.sheet_mut(id) else {
            return Ok(());
        };
        for dv in children(validations, "dataValidation") {
            if let Some(assignment) = parse_data_validation(dv)? {
                sheet.data_validations.push(assignment);
            }
        }
    }

    Ok(())
}

fn cell_value(c: roxmltree::Node<'_, '_>, shared_strings: &[String]) -> Result<CellValue, XlsxError> {
    let raw = child(c, "v").and_then(|v| v.text()).unwrap_or_default();
    let value = match c.attribute("t") {
        Some("inlineStr") => match child(c, "is") {
            Some(is) => CellValue::String(rich_text(is)),
            None => CellValue::Empty,
        },
        Some("s") => {
            let idx: usize = raw
                .trim()
                .parse()
                .map_err(|_| XlsxError::Invalid(format!("invalid shared string index `{raw}`")))?;
            let text = shared_strings.get(idx).ok_or_else(|| {
                XlsxError::Invalid(format!("shared string index {idx} out of range"))
            })?;
            CellValue::String(text.clone())
        }
        Some("b") => CellValue::Boolean(raw.trim() == "1"),
        // Formula strings and error values are kept as their displayed text.
        Some("str") | Some("e") => CellValue::String(raw.to_string()),
        _ if raw.trim().is_empty() => CellValue::Empty,
        _ => CellValue::Number(
            raw.trim()
                .parse()
                .map_err(|_| XlsxError::Invalid(format!("invalid number `{raw}`")))?,
        ),
    };
    Ok(value)
}

/// The formula text of a cell, if it has one.
///
/// Cells that only point at a shared formula (`<f t="shared" si=".."/>`)
/// carry no text of their own; they keep just their cached value.
fn cell_formula(c: roxmltree::Node<'_, '_>) -> Option<String> {
    let f = child(c, "f")?;
    match f.text().map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => Some(text.to_string()),
        None => {
            log::warn!(
                "cell {}: shared formula reference kept as its cached value",
                c.attribute("r").unwrap_or("?")
            );
            None
        }
    }
}

fn parse_data_validation(
    node: roxmltree::Node<'_, '_>,
) -> Result<Option<DataValidationAssignment>, XlsxError> {
    if node.attribute("type") != Some("list") {
        log::debug!(
            "skipping unsupported data validation type {:?}",
            node.attribute("type")
        );
        return Ok(None);
    }
    let sqref = node
        .attribute("sqref")
        .ok_or(XlsxError::MissingAttr("sqref"))?;
    let ranges = parse_sqref(sqref).map_err(|e| XlsxError::Invalid(e.to_string()))?;
    let formula1 = child(node, "formula1")
        .and_then(|f| f.text())
        .unwrap_or_default()
        .to_string();

    let error_style = match node.attribute("errorStyle") {
        Some("warning") => DataValidationErrorStyle::Warning,
        Some("information") => DataValidationErrorStyle::Information,
        _ => DataValidationErrorStyle::Stop,
    };

    Ok(Some(DataValidationAssignment {
        ranges,
        validation: DataValidation {
            kind: DataValidationKind::List,
            formula1,
            allow_blank: xml_bool(node.attribute("allowBlank")),
            show_error_message: xml_bool(node.attribute("showErrorMessage")),
            // OOXML `showDropDown` is inverted ("hide the dropdown").
            show_drop_down: !xml_bool(node.attribute("showDropDown")),
            error_style,
        },
    }))
}

fn xml_bool(val: Option<&str>) -> bool {
    matches!(val, Some("1") | Some("true"))
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>, XlsxError> {
    let doc = roxmltree::Document::parse(xml)?;
    Ok(children(doc.root_element(), "si").map(rich_text).collect())
}

/// Concatenate the `<t>` runs of a string item, skipping phonetic runs.
fn rich_text(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "t")
        .filter(|t| !t.ancestors().any(|a| a.tag_name().name() == "rPh"))
        .filter_map(|t| t.text())
        .collect()
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, Relationship>, XlsxError> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut out = HashMap::new();
    for rel in children(doc.root_element(), "Relationship") {
        let (Some(id), Some(kind), Some(target)) = (
            rel.attribute("Id"),
            rel.attribute("Type"),
            rel.attribute("Target"),
        ) else {
            continue;
        };
        out.insert(
            id.to_string(),
            Relationship {
                kind: kind.to_string(),
                target: target.to_string(),
            },
        );
    }
    Ok(out)
}

fn part_for_type(rels: &HashMap<String, Relationship>, kind: &str) -> Option<String> {
    rels.values()
        .find(|r| r.kind == kind)
        .map(|r| resolve_target(&r.target))
}

/// Resolve a workbook relationship target to a zip part name.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, XlsxError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    if file.size() > MAX_PART_BYTES {
        return Err(XlsxError::PartTooLarge {
            part: name.to_string(),
            size: file.size(),
            max: MAX_PART_BYTES,
        });
    }
    let mut out = String::with_capacity(file.size() as usize);
    file.read_to_string(&mut out)?;
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_and_absolute_targets() {
        assert_eq!(resolve_target("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("/xl/styles.xml"), "xl/styles.xml");
    }

    #[test]
    fn shared_strings_skip_phonetic_runs() {
        let xml = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <si><t>plain</t></si>
  <si><r><t>ri</t></r><r><t>ch</t></r><rPh sb="0" eb="1"><t>x</t></rPh></si>
</sst>"#;
        assert_eq!(parse_shared_strings(xml).unwrap(), vec!["plain", "rich"]);
    }
}
