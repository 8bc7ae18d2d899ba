use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{CellRef, CellValue};

/// Maximum rows per worksheet (1,048,576).
pub const EXCEL_MAX_ROWS: u32 = 1_048_576;

/// Maximum columns per worksheet (16,384).
pub const EXCEL_MAX_COLS: u32 = 16_384;

const COL_BITS: u32 = 14; // 2^14 = 16,384 columns.
const COL_MASK: u64 = (1u64 << COL_BITS) - 1;

/// Compact key used for sparse cell storage.
///
/// The key is a packed `(row, col)` pair:
///
/// ```text
/// key = (row << 14) | col
/// ```
///
/// Ordering keys orders cells row-major, which is the order the worksheet
/// serializer needs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(transparent)]
pub struct CellKey(u64);

impl CellKey {
    /// Encode a `(row, col)` coordinate.
    ///
    /// Callers are expected to bounds-check first (see [`CellKey::try_new`]).
    #[inline]
    const fn new_unchecked(row: u32, col: u32) -> Self {
        Self(((row as u64) << COL_BITS) | (col as u64))
    }

    /// Encode a `(row, col)` coordinate, returning `None` if it is out of bounds.
    #[inline]
    pub const fn try_new(row: u32, col: u32) -> Option<Self> {
        if row >= EXCEL_MAX_ROWS || col >= EXCEL_MAX_COLS {
            return None;
        }
        Some(Self::new_unchecked(row, col))
    }

    #[inline]
    pub const fn row(self) -> u32 {
        (self.0 >> COL_BITS) as u32
    }

    #[inline]
    pub const fn col(self) -> u32 {
        (self.0 & COL_MASK) as u32
    }

    #[inline]
    pub const fn to_ref(self) -> CellRef {
        CellRef::new(self.row(), self.col())
    }

    #[inline]
    pub const fn from_ref(cell: CellRef) -> Option<Self> {
        Self::try_new(cell.row, cell.col)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        let row = raw >> COL_BITS;
        let col = raw & COL_MASK;

        if row >= EXCEL_MAX_ROWS as u64 {
            return Err(D::Error::custom(format!(
                "CellKey row out of bounds: {row}"
            )));
        }
        if col >= EXCEL_MAX_COLS as u64 {
            return Err(D::Error::custom(format!(
                "CellKey col out of bounds: {col}"
            )));
        }

        Ok(CellKey(raw))
    }
}

/// A stored cell: a value plus a style id into the workbook's style table.
///
/// A formula cell keeps its formula text (without the leading `=`) and its
/// last computed value; nothing here evaluates formulas. Cells that are
/// empty, unstyled and formula-free are never stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "is_default_style")]
    pub style_id: u32,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            formula: None,
            style_id: 0,
        }
    }

    /// True if the cell carries no value, formula or style.
    pub fn is_truly_empty(&self) -> bool {
        self.value.is_empty() && self.formula.is_none() && self.style_id == 0
    }
}

fn is_default_style(id: &u32) -> bool {
    *id == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_roundtrips_coordinates() {
        let key = CellKey::try_new(17, 6).unwrap();
        assert_eq!(key.row(), 17);
        assert_eq!(key.col(), 6);
        assert_eq!(key.to_ref(), CellRef::new(17, 6));
    }

    #[test]
    fn key_orders_row_major() {
        let a = CellKey::try_new(0, 16_000).unwrap();
        let b = CellKey::try_new(1, 0).unwrap();
        assert!(a < b);
    }

    #[test]
    fn key_rejects_out_of_bounds() {
        assert!(CellKey::try_new(EXCEL_MAX_ROWS, 0).is_none());
        assert!(CellKey::try_new(0, EXCEL_MAX_COLS).is_none());
    }
}
