//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PivotError {
    #[error("Select at least one row field")]
    NoRowFields,

    #[error("Column not found: {0}")]
    UnknownColumn(String),

    #[error("Unknown aggregation: {0}")]
    UnknownAggregation(String),
}
