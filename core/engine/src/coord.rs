//! FILENAME: core/engine/src/coord.rs
//! PURPOSE: Utilities for A1-style cell references and rectangular ranges.
//! CONTEXT: Sheet requests may carry a sub-range such as "A1:K29". This module
//! converts between that notation and 0-based (row, col) indices.
//! Column "A" = 0, "B" = 1, ..., "Z" = 25, "AA" = 26, etc.
//! Row 1 in A1 notation = row 0 internally.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (u32, u32);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid cell reference: no column letters in '{0}'")]
    MissingColumn(String),

    #[error("Invalid cell reference: no row number in '{0}'")]
    MissingRow(String),

    #[error("Invalid row number in '{0}'")]
    InvalidRow(String),

    #[error("Invalid range format: '{0}'. Expected 'A1:B2'")]
    InvalidFormat(String),
}

/// Converts a column string (e.g., "A", "AA", "ABC") to a 0-based column index.
/// Returns None if the string is empty or contains non-alphabetic characters.
pub fn col_to_index(col_str: &str) -> Option<u32> {
    if col_str.is_empty() {
        return None;
    }
    let mut result: u32 = 0;
    for c in col_str.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        result = result.checked_mul(26)?.checked_add(digit)?;
    }
    Some(result - 1)
}

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// Converts a 0-based (row, col) coordinate to an A1-style reference string.
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row + 1)
}

/// Parses a cell reference like "A1" into (row, col) 0-indexed coordinates.
pub fn parse_cell_ref(cell_ref: &str) -> Result<CellCoord, RangeError> {
    let cell_ref = cell_ref.trim().to_uppercase();

    let col_end = cell_ref
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .count();

    if col_end == 0 {
        return Err(RangeError::MissingColumn(cell_ref));
    }

    let (col_str, row_str) = cell_ref.split_at(col_end);
    if row_str.is_empty() {
        return Err(RangeError::MissingRow(cell_ref));
    }

    let row: u32 = row_str
        .parse()
        .map_err(|_| RangeError::InvalidRow(cell_ref.clone()))?;
    if row == 0 {
        return Err(RangeError::InvalidRow(cell_ref));
    }

    let col = col_to_index(col_str).ok_or_else(|| RangeError::MissingColumn(cell_ref.clone()))?;

    Ok((row - 1, col))
}

/// A rectangular block of cells, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    /// Parses "TopLeft:BottomRight" notation, e.g. "A1:K29".
    /// Corners are normalized so that start <= end on both axes.
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        let parts: Vec<&str> = range.split(':').collect();
        if parts.len() != 2 {
            return Err(RangeError::InvalidFormat(range.to_string()));
        }

        let a = parse_cell_ref(parts[0])?;
        let b = parse_cell_ref(parts[1])?;

        Ok(CellRange {
            start: (a.0.min(b.0), a.1.min(b.1)),
            end: (a.0.max(b.0), a.1.max(b.1)),
        })
    }

    pub fn row_count(&self) -> u32 {
        self.end.0 - self.start.0 + 1
    }

    pub fn col_count(&self) -> u32 {
        self.end.1 - self.start.1 + 1
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.0 >= self.start.0
            && coord.0 <= self.end.0
            && coord.1 >= self.start.1
            && coord.1 <= self.end.1
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", coord_to_a1(self.start), coord_to_a1(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_index() {
        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("Z"), Some(25));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(col_to_index("ZZ"), Some(701));
        assert_eq!(col_to_index("aaa"), Some(702));
        assert_eq!(col_to_index(""), None);
        assert_eq!(col_to_index("A1"), None);
    }

    #[test]
    fn test_index_to_col() {
        assert_eq!(index_to_col(0), "A");
        assert_eq!(index_to_col(25), "Z");
        assert_eq!(index_to_col(26), "AA");
        assert_eq!(index_to_col(701), "ZZ");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Ok((0, 0)));
        assert_eq!(parse_cell_ref("k29"), Ok((28, 10)));
        assert!(matches!(parse_cell_ref("12"), Err(RangeError::MissingColumn(_))));
        assert!(matches!(parse_cell_ref("B"), Err(RangeError::MissingRow(_))));
        assert!(matches!(parse_cell_ref("B0"), Err(RangeError::InvalidRow(_))));
    }

    #[test]
    fn test_parse_range() {
        let range = CellRange::parse("M9:Q25").unwrap();
        assert_eq!(range.start, (8, 12));
        assert_eq!(range.end, (24, 16));
        assert_eq!(range.row_count(), 17);
        assert_eq!(range.col_count(), 5);
        assert_eq!(range.to_string(), "M9:Q25");
    }

    #[test]
    fn test_parse_range_normalizes_corners() {
        let range = CellRange::parse("F15:A7").unwrap();
        assert_eq!(range.to_string(), "A7:F15");
        assert!(range.contains((6, 0)));
        assert!(!range.contains((15, 0)));
    }

    #[test]
    fn test_parse_range_rejects_single_cell() {
        assert!(matches!(CellRange::parse("A1"), Err(RangeError::InvalidFormat(_))));
    }
}
