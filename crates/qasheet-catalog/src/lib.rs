//! The static catalog of manual test scenarios and the localized labels used
//! to lay it out.
//!
//! Catalogs are plain data: an embedded JSON asset per [`Locale`], or any JSON
//! file with the same shape. Declared totals are hand-maintained next to the
//! scenarios; [`verify`] checks them (and the id numbering) against the data.

mod error;
mod labels;
mod locale;
mod model;
mod verify;

pub use error::CatalogError;
pub use labels::{Labels, EN, MARKER_CRITICAL, MARKER_NORMAL, PLACEHOLDER, RU};
pub use locale::{Locale, UnknownLocale};
pub use model::{Catalog, Scenario, Section};
pub use verify::{ensure_valid, verify, CatalogIssue};
