use std::path::PathBuf;

use crate::CatalogIssue;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog failed verification with {} issue(s); first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Verification(Vec<CatalogIssue>),
}
