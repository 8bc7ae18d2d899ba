use std::fmt::Write as _;
use std::io::{Cursor, Write};

use qasheet_model::{
    format_sqref, CellValue, DataValidationAssignment, DataValidationErrorStyle,
    DataValidationKind, Workbook, Worksheet,
};
use quick_xml::escape::escape;
use zip::write::FileOptions;

use crate::styles::styles_xml;
use crate::XlsxError;

/// Serialize a workbook to `.xlsx` bytes.
///
/// Output is deterministic: the same model always produces the same bytes
/// (zip entries carry a fixed timestamp).
pub fn write_workbook(workbook: &Workbook) -> Result<Vec<u8>, XlsxError> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options = FileOptions::<()>::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(content_types_xml(workbook.sheets.len()).as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(rels_xml().as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(workbook_xml(workbook).as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(workbook_rels_xml(workbook.sheets.len()).as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(styles_xml(&workbook.styles).as_bytes())?;

        for (idx, sheet) in workbook.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)?;
            zip.write_all(worksheet_xml(sheet).as_bytes())?;
        }

        zip.finish()?;
    }
    log::debug!(
        "serialized workbook with {} sheet(s) and {} style(s)",
        workbook.sheets.len(),
        workbook.styles.len()
    );
    Ok(buffer.into_inner())
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    out.push('\n');
    out.push_str(r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Default Extension="xml" ContentType="application/xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    out.push('\n');
    for idx in 1..=sheet_count {
        let _ = writeln!(
            out,
            r#"  <Override PartName="/xl/worksheets/sheet{idx}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        );
    }
    out.push_str(r#"  <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    out.push('\n');
    out.push_str("</Types>\n");
    out
}

fn rels_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>
"#
    .to_owned()
}

fn workbook_xml(workbook: &Workbook) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    out.push('\n');
    out.push_str("  <sheets>\n");
    for (idx, sheet) in workbook.sheets.iter().enumerate() {
        let _ = writeln!(
            out,
            r#"    <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(sheet.name.as_str()),
            idx + 1,
            idx + 1
        );
    }
    out.push_str("  </sheets>\n");
    out.push_str("</workbook>\n");
    out
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    out.push('\n');
    for idx in 1..=sheet_count {
        let _ = writeln!(
            out,
            r#"  <Relationship Id="rId{idx}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{idx}.xml"/>"#
        );
    }
    let _ = writeln!(
        out,
        r#"  <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        sheet_count + 1
    );
    out.push_str("</Relationships>\n");
    out
}

pub(crate) fn worksheet_xml(sheet: &Worksheet) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#);
    out.push('\n');

    let mut current_row: Option<u32> = None;
    out.push_str("  <sheetData>\n");
    for (cell_ref, cell) in sheet.iter_cells() {
        if current_row != Some(cell_ref.row) {
            if current_row.is_some() {
                out.push_str("    </row>\n");
            }
            let _ = writeln!(out, r#"    <row r="{}">"#, cell_ref.row + 1);
            current_row = Some(cell_ref.row);
        }

        let style_attr = if cell.style_id == 0 {
            String::new()
        } else {
            format!(r#" s="{}""#, cell.style_id)
        };
        let a1 = cell_ref.to_a1();
        let formula = cell
            .formula
            .as_deref()
            .map(|f| format!("<f>{}</f>", escape(f)))
            .unwrap_or_default();
        match &cell.value {
            CellValue::Empty if formula.is_empty() => {
                let _ = writeln!(out, r#"      <c r="{a1}"{style_attr}/>"#);
            }
            CellValue::Empty => {
                let _ = writeln!(out, r#"      <c r="{a1}"{style_attr}>{formula}</c>"#);
            }
            CellValue::Number(n) => {
                let _ = writeln!(out, r#"      <c r="{a1}"{style_attr}>{formula}<v>{n}</v></c>"#);
            }
            CellValue::Boolean(b) => {
                let _ = writeln!(
                    out,
                    r#"      <c r="{a1}"{style_attr} t="b">{formula}<v>{}</v></c>"#,
                    u8::from(*b)
                );
            }
            // A formula's text result is stored as `t="str"`; `inlineStr`
            // cells cannot carry a formula.
            CellValue::String(s) if !formula.is_empty() => {
                let _ = writeln!(
                    out,
                    r#"      <c r="{a1}"{style_attr} t="str">{formula}<v>{}</v></c>"#,
                    escape(s.as_str())
                );
            }
            CellValue::String(s) => {
                let _ = writeln!(
                    out,
                    r#"      <c r="{a1}"{style_attr} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    escape(s.as_str())
                );
            }
        }
    }
    if current_row.is_some() {
        out.push_str("    </row>\n");
    }
    out.push_str("  </sheetData>\n");

    if !sheet.data_validations.is_empty() {
        out.push_str(&write_data_validations_section(&sheet.data_validations));
    }

    out.push_str("</worksheet>\n");
    out
}

fn write_data_validations_section(assignments: &[DataValidationAssignment]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"  <dataValidations count="{}">"#, assignments.len());
    for assignment in assignments {
        let dv = &assignment.validation;
        let kind = match dv.kind {
            DataValidationKind::List => "list",
        };
        let _ = write!(out, r#"    <dataValidation type="{kind}""#);
        match dv.error_style {
            DataValidationErrorStyle::Stop => {}
            DataValidationErrorStyle::Warning => out.push_str(r#" errorStyle="warning""#),
            DataValidationErrorStyle::Information => {
                out.push_str(r#" errorStyle="information""#)
            }
        }
        if dv.allow_blank {
            out.push_str(r#" allowBlank="1""#);
        }
        // OOXML `showDropDown` is inverted ("hide the dropdown").
        if !dv.show_drop_down {
            out.push_str(r#" showDropDown="1""#);
        }
        if dv.show_error_message {
            out.push_str(r#" showErrorMessage="1""#);
        }
        let _ = writeln!(
            out,
            r#" sqref="{}"><formula1>{}</formula1></dataValidation>"#,
            format_sqref(&assignment.ranges),
            escape(dv.formula1.as_str())
        );
    }
    out.push_str("  </dataValidations>\n");
    out
}
