use core::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{EXCEL_MAX_COLS, EXCEL_MAX_ROWS};

/// A 0-indexed cell coordinate: `CellRef::new(0, 0)` is `A1`, `CellRef::new(2, 5)`
/// is `F3`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn to_a1(self) -> String {
        format!("{}{}", column_letters(self.col), u64::from(self.row) + 1)
    }

    /// Parse `F3`, `f3` or the absolute form `$F$3`.
    pub fn from_a1(a1: &str) -> Result<Self, A1ParseError> {
        let text: String = a1.trim().chars().filter(|&c| c != '$').collect();
        if text.is_empty() {
            return Err(A1ParseError::Empty);
        }

        let split = text
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(text.len());
        let (letters, digits) = text.split_at(split);
        let well_formed = !letters.is_empty()
            && !digits.is_empty()
            && letters.bytes().all(|b| b.is_ascii_alphabetic())
            && digits.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(A1ParseError::Malformed);
        }

        let col = column_index(letters).ok_or(A1ParseError::ColumnOutOfRange)?;
        let row = digits
            .parse::<u32>()
            .ok()
            .filter(|row| (1..=EXCEL_MAX_ROWS).contains(row))
            .ok_or(A1ParseError::RowOutOfRange)?;
        Ok(Self::new(row - 1, col))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// An inclusive rectangle of cells with `start` at the top-left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: CellRef,
    pub end: CellRef,
}

impl Range {
    /// The rectangle spanned by two opposite corners, in either order.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// A block of `rows` x `cols` cells whose top-left corner is `origin`.
    ///
    /// Returns `None` for an empty block; ranges always cover at least one cell.
    pub fn from_origin(origin: CellRef, rows: u32, cols: u32) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        let end = CellRef::new(
            origin.row.saturating_add(rows - 1),
            origin.col.saturating_add(cols - 1),
        );
        Some(Self { start: origin, end })
    }

    /// Row `row`, columns `0..cols`.
    pub fn row_span(row: u32, cols: u32) -> Option<Self> {
        Self::from_origin(CellRef::new(row, 0), 1, cols)
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.col..=self.end.col).contains(&cell.col)
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Every cell of the range, row by row.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> {
        let cols = self.start.col..=self.end.col;
        (self.start.row..=self.end.row)
            .flat_map(move |row| cols.clone().map(move |col| CellRef::new(row, col)))
    }

    /// Parse `F3:F14`, or a single cell such as `C3`.
    pub fn from_a1(a1: &str) -> Result<Self, RangeParseError> {
        let text = a1.trim();
        if text.is_empty() {
            return Err(RangeParseError::Empty);
        }
        let (first, last) = text.split_once(':').unwrap_or((text, text));
        let start = CellRef::from_a1(first).map_err(RangeParseError::Cell)?;
        let end = CellRef::from_a1(last).map_err(RangeParseError::Cell)?;
        Ok(Range::new(start, end))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

/// Parse the space-separated range list of a `sqref` attribute.
pub fn parse_sqref(sqref: &str) -> Result<Vec<Range>, RangeParseError> {
    let ranges = sqref
        .split_whitespace()
        .map(Range::from_a1)
        .collect::<Result<Vec<_>, _>>()?;
    if ranges.is_empty() {
        return Err(RangeParseError::Empty);
    }
    Ok(ranges)
}

pub fn format_sqref(ranges: &[Range]) -> String {
    ranges
        .iter()
        .map(Range::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum A1ParseError {
    Empty,
    /// Not column letters followed by row digits.
    Malformed,
    ColumnOutOfRange,
    RowOutOfRange,
}

impl fmt::Display for A1ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A1ParseError::Empty => f.write_str("empty cell reference"),
            A1ParseError::Malformed => f.write_str("expected column letters followed by a row number"),
            A1ParseError::ColumnOutOfRange => write!(f, "column is past the last one (XFD, {EXCEL_MAX_COLS})"),
            A1ParseError::RowOutOfRange => write!(f, "row must be between 1 and {EXCEL_MAX_ROWS}"),
        }
    }
}

impl std::error::Error for A1ParseError {}

#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseError {
    Empty,
    Cell(A1ParseError),
}

impl fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeParseError::Empty => f.write_str("empty range"),
            RangeParseError::Cell(e) => write!(f, "bad range corner: {e}"),
        }
    }
}

impl std::error::Error for RangeParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RangeParseError::Empty => None,
            RangeParseError::Cell(e) => Some(e),
        }
    }
}

/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`.
fn column_letters(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Inverse of [`column_letters`]; `None` past column XFD.
fn column_index(letters: &str) -> Option<u32> {
    let number = letters.bytes().try_fold(0u32, |acc, b| {
        acc.checked_mul(26)?
            .checked_add(u32::from(b.to_ascii_uppercase() - b'A') + 1)
    })?;
    (number <= EXCEL_MAX_COLS).then(|| number - 1)
}
