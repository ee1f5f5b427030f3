//! FILENAME: core/engine/src/highlight.rs
//! PURPOSE: Flags rows that fall below the performance target.
//! CONTEXT: Dashboard tables emphasise every row whose key column (SCORE,
//! ACHIEVEMENT, ...) is under 100. Threshold and comparison are fixed.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::numeric::parse_number;
use crate::table::RowRef;

/// Rows strictly below this value are flagged.
pub const TARGET_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStyle {
    Normal,
    BelowTarget,
}

/// Classifies a single key-column value.
pub fn classify_value(value: &CellValue) -> RowStyle {
    let parsed = match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_number(s),
        CellValue::Empty => None,
    };
    match parsed {
        Some(n) if n < TARGET_THRESHOLD => RowStyle::BelowTarget,
        _ => RowStyle::Normal,
    }
}

/// Classifies a row by its value in `key_column`.
/// Missing columns and unparseable values leave the row unstyled.
pub fn classify(row: RowRef<'_>, key_column: &str) -> RowStyle {
    row.get(key_column).map_or(RowStyle::Normal, classify_value)
}
