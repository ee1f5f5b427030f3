//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - The computed cross-tabulation, ready for display.
//!
//! A `PivotResult` is a dense grid: one entry per row label and column label,
//! with the "Grand Total" row always last and, when column keys were given,
//! the "Grand Total" column always last.

use serde::{Deserialize, Serialize};

use engine::format_number;

use crate::definition::{AggregationType, GRAND_TOTAL};

/// Separator used when a multi-level label is flattened into one string.
pub const LABEL_SEPARATOR: &str = " - ";

/// One entry on a result axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLabel {
    /// One part per key level, outer level first.
    pub parts: Vec<String>,
    pub is_grand_total: bool,
}

impl AxisLabel {
    pub fn new(parts: Vec<String>) -> Self {
        AxisLabel {
            parts,
            is_grand_total: false,
        }
    }

    /// The margin label: "Grand Total" followed by blanks for inner levels.
    pub fn grand_total(levels: usize) -> Self {
        let mut parts = vec![String::new(); levels.max(1)];
        parts[0] = GRAND_TOTAL.to_string();
        AxisLabel {
            parts,
            is_grand_total: true,
        }
    }

    /// Parts joined with `sep`, skipping blank inner parts.
    pub fn joined(&self, sep: &str) -> String {
        self.parts
            .iter()
            .filter(|p| !p.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(sep)
    }

    pub fn matches<S: AsRef<str>>(&self, parts: &[S]) -> bool {
        self.parts.len() == parts.len()
            && self.parts.iter().zip(parts).all(|(a, b)| a == b.as_ref())
    }
}

/// The result of `compute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotResult {
    pub row_fields: Vec<String>,
    pub column_fields: Vec<String>,
    pub value_field: String,
    pub aggregation: AggregationType,

    /// Row axis, data rows first, Grand Total last.
    pub rows: Vec<AxisLabel>,

    /// Column axis. Without column keys this is a single label naming the
    /// value field and there is no column margin.
    pub columns: Vec<AxisLabel>,

    /// `values[row][col]`, aligned with `rows` and `columns`.
    pub values: Vec<Vec<f64>>,
}

impl PivotResult {
    pub fn has_column_margin(&self) -> bool {
        self.columns.last().map_or(false, |c| c.is_grand_total)
    }

    pub fn row_index<S: AsRef<str>>(&self, parts: &[S]) -> Option<usize> {
        self.rows.iter().position(|r| r.matches(parts))
    }

    pub fn column_index<S: AsRef<str>>(&self, parts: &[S]) -> Option<usize> {
        self.columns.iter().position(|c| c.matches(parts))
    }

    /// Looks up a cell by row and column label parts.
    pub fn value<S: AsRef<str>, T: AsRef<str>>(&self, row: &[S], column: &[T]) -> Option<f64> {
        let r = self.row_index(row)?;
        let c = self.column_index(column)?;
        Some(self.values[r][c])
    }

    pub fn grand_total_row(&self) -> Option<&[f64]> {
        self.rows
            .iter()
            .position(|r| r.is_grand_total)
            .map(|i| self.values[i].as_slice())
    }

    /// Rows that are not the margin.
    pub fn data_row_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_grand_total).count()
    }

    /// Renders headers and rows as strings: one label column per row field,
    /// then one value column per column label.
    pub fn to_string_grid(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let mut headers: Vec<String> = self.row_fields.clone();
        headers.extend(self.columns.iter().map(|c| c.joined(LABEL_SEPARATOR)));

        let rows = self
            .rows
            .iter()
            .zip(&self.values)
            .map(|(label, values)| {
                let mut line = label.parts.clone();
                line.extend(values.iter().map(|v| format_number(*v)));
                line
            })
            .collect();

        (headers, rows)
    }
}
