//! FILENAME: core/persistence/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("No usable credentials: {0}")]
    Credentials(String),

    #[error("Invalid range: {0}")]
    InvalidRange(#[from] engine::RangeError),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Source error: {0}")]
    Source(String),
}
