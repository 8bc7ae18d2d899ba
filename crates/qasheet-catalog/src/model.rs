use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::labels::{MARKER_CRITICAL, MARKER_NORMAL, PLACEHOLDER};
use crate::{CatalogError, Locale};

/// One manual test case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Dotted `"<section>.<position>"`, e.g. `"2.13"`.
    pub id: String,
    pub name: String,
    /// Only selects the priority marker.
    #[serde(default)]
    pub critical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<String>,
    pub expected: String,
}

impl Scenario {
    pub fn marker(&self) -> &'static str {
        if self.critical {
            MARKER_CRITICAL
        } else {
            MARKER_NORMAL
        }
    }

    /// Preconditions as rendered in a sheet; absent or blank ones become
    /// [`PLACEHOLDER`].
    pub fn preconditions_or_placeholder(&self) -> &str {
        match self.preconditions.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => PLACEHOLDER,
        }
    }
}

/// A functional area under test. Its position in the catalog gives the
/// 1-based number used in sheet names and headings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// Hand-maintained count shown on the summary sheet.
    pub total: u32,
    pub scenarios: Vec<Scenario>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub locale: Locale,
    /// Hand-maintained grand total shown on the summary sheet.
    pub total: u32,
    pub sections: Vec<Section>,
}

impl Catalog {
    /// The catalog shipped with the crate for `locale`.
    pub fn builtin(locale: Locale) -> Result<Self, CatalogError> {
        let catalog = Self::from_json_str(locale.builtin_catalog_json())?;
        log::debug!(
            "loaded builtin {locale} catalog: {} section(s), {} scenario(s)",
            catalog.sections.len(),
            catalog.scenario_count()
        );
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        log::info!(
            "loaded catalog {}: {} section(s), {} scenario(s)",
            path.display(),
            catalog.sections.len(),
            catalog.scenario_count()
        );
        Ok(catalog)
    }

    pub fn scenario_count(&self) -> usize {
        self.sections.iter().map(|s| s.scenarios.len()).sum()
    }

    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}
