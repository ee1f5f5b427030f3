//! FILENAME: core/persistence/src/lib.rs
//! Tabular Loader
//!
//! Fetches blocks of sheet cells from a `SheetSource`, turns them into typed
//! tables and keeps recent loads in an expiring cache.

mod error;
pub mod cache;
pub mod credentials;
pub mod loader;
pub mod source;
pub mod workbook;

pub use cache::{Clock, LoadCache, ManualClock, SystemClock, DEFAULT_TTL};
pub use credentials::{CredentialConfig, CredentialOrigin, CredentialResolver, Credentials, ServiceAccountKey};
pub use error::LoadError;
pub use loader::Loader;
pub use source::{crop_grid, trim_grid, MemorySource, RawGrid, SheetRequest, SheetSource};
pub use workbook::{read_sheet, WorkbookSource};
