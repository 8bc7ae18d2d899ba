//! Consistency checks for the hand-maintained parts of a catalog.

use std::collections::HashSet;

use serde::Serialize;

use crate::{Catalog, CatalogError, Locale};

/// A single inconsistency found by [`verify`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogIssue {
    #[error("section {section}: scenario at position {position} has id `{found}`, expected `{expected}`")]
    IdOutOfSequence {
        section: usize,
        position: usize,
        expected: String,
        found: String,
    },
    #[error("duplicate scenario id `{id}`")]
    DuplicateId { id: String },
    #[error("section `{section}` declares {declared} scenario(s) but lists {actual}")]
    SectionTotalMismatch {
        section: String,
        declared: u32,
        actual: usize,
    },
    #[error("catalog declares a total of {declared} but its sections declare {actual}")]
    CatalogTotalMismatch { declared: u32, actual: u64 },
    #[error("section {section} has an empty name")]
    EmptySectionName { section: usize },
    #[error("scenario `{id}` has an empty {field}")]
    EmptyField { id: String, field: &'static str },
    #[error("sheet name `{name}` is not usable: {reason}")]
    InvalidSheetName { name: String, reason: String },
    #[error("{location} {field} contains U+{code_point:04X}, which a workbook cannot store")]
    IllegalCharacter {
        location: String,
        field: &'static str,
        code_point: u32,
    },
}

/// Check a catalog's numbering, declared totals and derived sheet names.
///
/// Returns every issue found; an empty result means the catalog is
/// consistent.
pub fn verify(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    let mut seen_ids = HashSet::new();
    // Sheet names only depend on the locale-independent numbering scheme.
    let labels = Locale::default().labels();

    for (idx, section) in catalog.sections.iter().enumerate() {
        let number = idx + 1;
        check_characters(&mut issues, || format!("section {number}"), "name", &section.name);
        if section.name.trim().is_empty() {
            issues.push(CatalogIssue::EmptySectionName { section: number });
        } else {
            let sheet_name = labels.section_sheet_name(idx, &section.name);
            if let Err(err) = qasheet_model::validate_sheet_name(&sheet_name) {
                issues.push(CatalogIssue::InvalidSheetName {
                    name: sheet_name,
                    reason: err.to_string(),
                });
            }
        }

        if section.total as usize != section.scenarios.len() {
            issues.push(CatalogIssue::SectionTotalMismatch {
                section: section.name.clone(),
                declared: section.total,
                actual: section.scenarios.len(),
            });
        }

        for (pos, scenario) in section.scenarios.iter().enumerate() {
            let expected = format!("{number}.{}", pos + 1);
            if scenario.id != expected {
                issues.push(CatalogIssue::IdOutOfSequence {
                    section: number,
                    position: pos + 1,
                    expected,
                    found: scenario.id.clone(),
                });
            }
            if !seen_ids.insert(scenario.id.as_str()) {
                issues.push(CatalogIssue::DuplicateId {
                    id: scenario.id.clone(),
                });
            }
            let location = || format!("scenario `{}`", scenario.id);
            check_characters(&mut issues, location, "id", &scenario.id);
            check_characters(&mut issues, location, "name", &scenario.name);
            if let Some(preconditions) = &scenario.preconditions {
                check_characters(&mut issues, location, "preconditions", preconditions);
            }
            check_characters(&mut issues, location, "expected result", &scenario.expected);
            if scenario.name.trim().is_empty() {
                issues.push(CatalogIssue::EmptyField {
                    id: scenario.id.clone(),
                    field: "name",
                });
            }
            if scenario.expected.trim().is_empty() {
                issues.push(CatalogIssue::EmptyField {
                    id: scenario.id.clone(),
                    field: "expected result",
                });
            }
        }
    }

    let declared_sum: u64 = catalog.sections.iter().map(|s| u64::from(s.total)).sum();
    if u64::from(catalog.total) != declared_sum {
        issues.push(CatalogIssue::CatalogTotalMismatch {
            declared: catalog.total,
            actual: declared_sum,
        });
    }

    if !issues.is_empty() {
        log::debug!("catalog verification found {} issue(s)", issues.len());
    }
    issues
}

/// Flag the first character of `text` outside the XML 1.0 `Char` production.
fn check_characters(
    issues: &mut Vec<CatalogIssue>,
    location: impl Fn() -> String,
    field: &'static str,
    text: &str,
) {
    if let Some(c) = text.chars().find(|&c| !is_xml_char(c)) {
        issues.push(CatalogIssue::IllegalCharacter {
            location: location(),
            field,
            code_point: u32::from(c),
        });
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// [`verify`], turning any issue into [`CatalogError::Verification`].
pub fn ensure_valid(catalog: &Catalog) -> Result<(), CatalogError> {
    let issues = verify(catalog);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Verification(issues))
    }
}
