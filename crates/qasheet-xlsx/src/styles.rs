//! `xl/styles.xml` for the style subset the model carries (bold/italic fonts
//! and solid background fills).
//!
//! `cellXfs` is written one-to-one with the workbook's style table, so a cell's
//! `s` attribute is simply its model `style_id`.

use std::fmt::Write as _;

use qasheet_model::{Color, Fill, Font, Style, StyleTable};

use crate::XlsxError;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Fill ids 0 and 1 are reserved by SpreadsheetML (`none` and `gray125`).
const FIRST_CUSTOM_FILL: usize = 2;

pub(crate) fn styles_xml(table: &StyleTable) -> String {
    let mut fonts: Vec<Font> = vec![Font::default()];
    let mut fills: Vec<Color> = Vec::new();
    let mut xfs: Vec<(usize, usize)> = Vec::with_capacity(table.len());

    for style in &table.styles {
        let font = style.font.clone().unwrap_or_default();
        let font_id = match fonts.iter().position(|f| *f == font) {
            Some(id) => id,
            None => {
                fonts.push(font);
                fonts.len() - 1
            }
        };
        let fill_id = match style.background() {
            None => 0,
            Some(color) => match fills.iter().position(|c| *c == color) {
                Some(idx) => idx + FIRST_CUSTOM_FILL,
                None => {
                    fills.push(color);
                    fills.len() - 1 + FIRST_CUSTOM_FILL
                }
            },
        };
        xfs.push((font_id, fill_id));
    }

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    let _ = writeln!(out, r#"<styleSheet xmlns="{MAIN_NS}">"#);

    let _ = writeln!(out, r#"  <fonts count="{}">"#, fonts.len());
    for font in &fonts {
        out.push_str("    <font>");
        if font.bold {
            out.push_str("<b/>");
        }
        if font.italic {
            out.push_str("<i/>");
        }
        out.push_str(r#"<sz val="11"/><name val="Calibri"/></font>"#);
        out.push('\n');
    }
    out.push_str("  </fonts>\n");

    let _ = writeln!(out, r#"  <fills count="{}">"#, fills.len() + FIRST_CUSTOM_FILL);
    out.push_str(r#"    <fill><patternFill patternType="none"/></fill>"#);
    out.push('\n');
    out.push_str(r#"    <fill><patternFill patternType="gray125"/></fill>"#);
    out.push('\n');
    for color in &fills {
        let _ = writeln!(
            out,
            r#"    <fill><patternFill patternType="solid"><fgColor rgb="{}"/><bgColor indexed="64"/></patternFill></fill>"#,
            color.to_argb_hex()
        );
    }
    out.push_str("  </fills>\n");

    out.push_str(r#"  <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#);
    out.push('\n');
    out.push_str(r#"  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);
    out.push('\n');

    let _ = writeln!(out, r#"  <cellXfs count="{}">"#, xfs.len());
    for (font_id, fill_id) in xfs {
        let _ = write!(
            out,
            r#"    <xf numFmtId="0" fontId="{font_id}" fillId="{fill_id}" borderId="0" xfId="0""#
        );
        if font_id != 0 {
            out.push_str(r#" applyFont="1""#);
        }
        if fill_id != 0 {
            out.push_str(r#" applyFill="1""#);
        }
        out.push_str("/>\n");
    }
    out.push_str("  </cellXfs>\n");

    out.push_str(r#"  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
    out.push('\n');
    out.push_str("</styleSheet>\n");
    out
}

/// Parse `styles.xml` into one [`Style`] per `cellXfs` entry.
///
/// Formatting the model does not carry (borders, number formats, fonts other
/// than bold/italic) is dropped.
pub(crate) fn parse_styles_xml(xml: &str) -> Result<Vec<Style>, XlsxError> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    let fonts: Vec<Font> = child(root, "fonts")
        .map(|fonts| {
            children(fonts, "font")
                .map(|font| Font {
                    bold: child(font, "b").is_some_and(flag_enabled),
                    italic: child(font, "i").is_some_and(flag_enabled),
                })
                .collect()
        })
        .unwrap_or_default();

    let fills: Vec<Option<Color>> = child(root, "fills")
        .map(|fills| children(fills, "fill").map(solid_fill_color).collect())
        .unwrap_or_default();

    let Some(cell_xfs) = child(root, "cellXfs") else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for xf in children(cell_xfs, "xf") {
        let font_id = attr_index(xf, "fontId")?;
        let fill_id = attr_index(xf, "fillId")?;
        let font = fonts.get(font_id).cloned().unwrap_or_default();
        let background = fills.get(fill_id).copied().flatten();
        out.push(Style {
            font: (font != Font::default()).then_some(font),
            fill: background.map(|c| Fill {
                background: Some(c),
            }),
        });
    }
    Ok(out)
}

fn solid_fill_color(fill: roxmltree::Node<'_, '_>) -> Option<Color> {
    let pattern = child(fill, "patternFill")?;
    if pattern.attribute("patternType") != Some("solid") {
        return None;
    }
    let rgb = child(pattern, "fgColor")?.attribute("rgb")?;
    rgb.parse().ok()
}

/// `<b/>` means bold unless it carries `val="0"`/`val="false"`.
fn flag_enabled(node: roxmltree::Node<'_, '_>) -> bool {
    !matches!(node.attribute("val"), Some("0") | Some("false"))
}

fn attr_index(node: roxmltree::Node<'_, '_>, name: &'static str) -> Result<usize, XlsxError> {
    match node.attribute(name) {
        None => Ok(0),
        Some(v) => v
            .parse()
            .map_err(|_| XlsxError::Invalid(format!("styles.xml: invalid {name} `{v}`"))),
    }
}

pub(crate) fn child<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

pub(crate) fn children<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}
