//! FILENAME: core/engine/src/numeric.rs
//! PURPOSE: Column type tagging and explicit, fallible numeric coercion.
//! CONTEXT: Sheets deliver every cell as text. Each column is tagged once at
//! load time as Text or Number. Coercions used later (pivot value columns,
//! dashboard key columns) return Option so the "default to 0" policy is a
//! visible branch at the call site.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

static ALL_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// The inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Number,
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Text
    }
}

/// True when the string is made only of digit characters.
/// Decimals, signs and thousands separators do not qualify.
pub fn is_all_digits(s: &str) -> bool {
    ALL_DIGITS.is_match(s)
}

/// Parses a trimmed string as a finite f64.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses a number written with a decimal comma ("85,5" -> 85.5).
pub fn parse_decimal_comma(s: &str) -> Option<f64> {
    parse_number(&s.replace(',', "."))
}

/// Numeric view of a cell for aggregation. None when the cell has no numeric reading.
pub fn cell_as_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_number(s),
        CellValue::Empty => None,
    }
}

/// Coerces a cell to a number, substituting 0 when it cannot be read as one.
pub fn coerce_number_or_zero(value: &CellValue) -> f64 {
    match cell_as_number(value) {
        Some(n) => n,
        None => 0.0,
    }
}

/// Decides the type of a column from its raw text values.
/// A column is numeric when it has at least one non-empty value and every
/// non-empty value is all digits.
pub fn infer_column_type(values: &[String]) -> ColumnType {
    let mut saw_value = false;
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !is_all_digits(value) {
            return ColumnType::Text;
        }
        saw_value = true;
    }
    if saw_value {
        ColumnType::Number
    } else {
        ColumnType::Text
    }
}

/// Tags a raw text column. When the column looks numeric but some value does
/// not convert, the column is left as text unchanged.
pub fn tag_column(values: Vec<String>) -> (ColumnType, Vec<CellValue>) {
    if infer_column_type(&values) == ColumnType::Number {
        if let Some(numbers) = convert_numeric(&values) {
            return (ColumnType::Number, numbers);
        }
        log::debug!("numeric-looking column kept as text after failed conversion");
    }
    (ColumnType::Text, values.into_iter().map(CellValue::Text).collect())
}

fn convert_numeric(values: &[String]) -> Option<Vec<CellValue>> {
    values
        .iter()
        .map(|v| {
            let v = v.trim();
            if v.is_empty() {
                Some(CellValue::Empty)
            } else {
                parse_number(v).map(CellValue::Number)
            }
        })
        .collect()
}
