//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The configuration of a cross-tabulation.
//!
//! This module contains the types needed to DESCRIBE a pivot:
//! which columns go on the row axis, which on the column axis, which column
//! is aggregated and how. A `PivotSpec` is built per user interaction and is
//! not modified once it has been used to compute a result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PivotError;

/// Label of the synthetic margin row and column.
pub const GRAND_TOTAL: &str = "Grand Total";

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for the value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    Count,
    Sum,
    Mean,
    Min,
    Max,
}

impl AggregationType {
    pub const ALL: [AggregationType; 5] = [
        AggregationType::Count,
        AggregationType::Sum,
        AggregationType::Mean,
        AggregationType::Min,
        AggregationType::Max,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggregationType::Count => "count",
            AggregationType::Sum => "sum",
            AggregationType::Mean => "mean",
            AggregationType::Min => "min",
            AggregationType::Max => "max",
        }
    }

    /// Whether the value column must be coerced to numbers first.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, AggregationType::Count)
    }
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Count
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationType {
    type Err = PivotError;

    /// Accepts the bare name ("sum") or a menu label ("sum (Total Angka)").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = s.trim().split_whitespace().next().unwrap_or("").to_lowercase();
        AggregationType::ALL
            .iter()
            .copied()
            .find(|a| a.name() == first)
            .ok_or_else(|| PivotError::UnknownAggregation(s.to_string()))
    }
}

// ============================================================================
// PIVOT SPEC
// ============================================================================

/// The complete description of one pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotSpec {
    /// Columns forming the row axis (outer to inner). Must not be empty.
    pub rows: Vec<String>,

    /// Columns forming the column axis (outer to inner). Optional.
    #[serde(default)]
    pub columns: Vec<String>,

    /// The column being aggregated.
    pub values: String,

    /// The aggregation function.
    #[serde(default)]
    pub aggregation: AggregationType,
}

impl PivotSpec {
    pub fn new(rows: Vec<String>, values: impl Into<String>, aggregation: AggregationType) -> Self {
        PivotSpec {
            rows,
            columns: Vec::new(),
            values: values.into(),
            aggregation,
        }
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Heading shown above the result, e.g. "SUM of REVENUE".
    pub fn title(&self) -> String {
        format!("{} of {}", self.aggregation.name().to_uppercase(), self.values)
    }

    /// Checks the structural invariants that do not need the source table.
    pub fn validate(&self) -> Result<(), PivotError> {
        if self.rows.is_empty() {
            return Err(PivotError::NoRowFields);
        }
        Ok(())
    }
}
