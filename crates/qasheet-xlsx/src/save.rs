//! Loading and atomically saving workbooks on disk.
//!
//! Saves go through a temp file in the destination directory which is flushed,
//! synced and then renamed over the target, so a failed save never leaves a
//! truncated workbook behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use qasheet_model::Workbook;
use tempfile::NamedTempFile;

use crate::{read_workbook, write_workbook, XlsxError};

fn parent_dir_or_dot(path: &Path) -> &Path {
    // `Path::parent` returns `Some("")` for bare relative file names like `qa.xlsx`.
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Serialize `workbook` and atomically replace `dest` with it.
pub fn save_workbook(dest: impl AsRef<Path>, workbook: &Workbook) -> Result<(), XlsxError> {
    let dest = dest.as_ref();
    let bytes = write_workbook(workbook)?;

    let dir = parent_dir_or_dot(dest);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.as_file_mut().write_all(&bytes)?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|err| XlsxError::Io(err.error))?;

    log::info!("saved {} bytes to {}", bytes.len(), dest.display());
    Ok(())
}

/// Read a workbook from disk.
pub fn load_workbook(path: impl AsRef<Path>) -> Result<Workbook, XlsxError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    log::debug!("loading {} ({} bytes)", path.display(), bytes.len());
    read_workbook(&bytes)
}
