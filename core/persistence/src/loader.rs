//! FILENAME: core/persistence/src/loader.rs
//! PURPOSE: Tabular Loader. Turns a sheet request into a typed `DataTable`.
//! CONTEXT: Resolves credentials when the source needs them, fetches the raw
//! grid, builds the table (header dedupe + numeric tagging) and keeps the
//! result in an expiring cache keyed by the full request.

use std::sync::Arc;
use std::time::Duration;

use engine::DataTable;

use crate::cache::{Clock, LoadCache, SystemClock, DEFAULT_TTL};
use crate::credentials::{CredentialResolver, Credentials};
use crate::source::{SheetRequest, SheetSource};
use crate::LoadError;

pub struct Loader {
    source: Box<dyn SheetSource>,
    credentials: CredentialResolver,
    cache: LoadCache<SheetRequest, DataTable>,
}

impl Loader {
    pub fn new(source: Box<dyn SheetSource>, credentials: CredentialResolver) -> Self {
        Loader {
            source,
            credentials,
            cache: LoadCache::new(DEFAULT_TTL, Arc::new(SystemClock::new())),
        }
    }

    /// Replaces the cache with one using `ttl` and `clock`.
    pub fn with_cache(mut self, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        self.cache = LoadCache::new(ttl, clock);
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Loads a table, serving from the cache while the entry is fresh.
    /// Failures are not cached.
    pub fn try_load(&self, request: &SheetRequest) -> Result<DataTable, LoadError> {
        if let Some(table) = self.cache.get(request) {
            log::debug!("cache hit {}", request);
            return Ok(table);
        }
        log::debug!("cache miss {}", request);

        let credentials = self.credentials_for_source()?;
        let grid = self.source.fetch(credentials.as_ref(), request)?;
        log::info!("fetched {} ({} raw rows)", request, grid.len());

        let table = DataTable::from_grid(grid);
        self.cache.insert(request.clone(), table.clone());
        Ok(table)
    }

    /// Loads a table; on failure logs the error and returns an empty table.
    pub fn load(&self, request: &SheetRequest) -> DataTable {
        self.load_or_report(request, |_| {})
    }

    /// Loads a table; on failure hands the error to `report` and returns an
    /// empty table.
    pub fn load_or_report<F>(&self, request: &SheetRequest, report: F) -> DataTable
    where
        F: FnOnce(&LoadError),
    {
        match self.try_load(request) {
            Ok(table) => table,
            Err(e) => {
                log::error!("failed to load {}: {}", request, e);
                report(&e);
                DataTable::new()
            }
        }
    }

    fn credentials_for_source(&self) -> Result<Option<Credentials>, LoadError> {
        if self.source.requires_credentials() {
            self.credentials.resolve().map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::credentials::{CredentialConfig, CredentialOrigin};
    use crate::source::{MemorySource, RawGrid};
    use engine::{CellValue, ColumnType};
    use std::path::Path;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn sample() -> RawGrid {
        grid(&[
            &["TEKNISI", "QTY", "QTY", "NOTE"],
            &["Andi", "10", "3", "ok"],
            &["Rina", "", "4", "x"],
        ])
    }

    fn no_credentials(dir: &Path) -> CredentialResolver {
        CredentialResolver::new(CredentialConfig {
            env_var: "DASH_LOADER_TEST".to_string(),
            secrets_path: dir.join("secrets.json"),
            secrets_key: "gcp_service_account".to_string(),
            key_file: dir.join("credentials.json"),
        })
        .with_env(|_| None)
    }

    fn loader(source: Arc<MemorySource>, clock: Arc<ManualClock>, dir: &Path) -> Loader {
        Loader::new(Box::new(source), no_credentials(dir)).with_cache(DEFAULT_TTL, clock)
    }

    #[test]
    fn test_load_builds_typed_table() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(MemorySource::new().with_sheet("main", "CEK IOAN", sample()));
        let loader = loader(source, Arc::new(ManualClock::new()), dir.path());

        let table = loader.load(&SheetRequest::new("main", "CEK IOAN"));
        assert_eq!(table.column_names(), vec!["TEKNISI", "QTY", "QTY_1", "NOTE"]);
        let qty = table.column("QTY").unwrap();
        assert_eq!(qty.column_type, ColumnType::Number);
        assert_eq!(qty.values, vec![CellValue::Number(10.0), CellValue::Empty]);
        assert_eq!(table.column("NOTE").unwrap().column_type, ColumnType::Text);
    }

    #[test]
    fn test_cache_hit_skips_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(MemorySource::new().with_sheet("main", "CEK IOAN", sample()));
        let clock = Arc::new(ManualClock::new());
        let loader = loader(source.clone(), clock.clone(), dir.path());
        let request = SheetRequest::new("main", "CEK IOAN").with_range("A1:K29");

        let first = loader.load(&request);
        clock.advance(Duration::from_secs(30));
        let second = loader.load(&request);

        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn test_cache_key_includes_range() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(MemorySource::new().with_sheet("main", "CEK IOAN", sample()));
        let loader = loader(source.clone(), Arc::new(ManualClock::new()), dir.path());

        loader.load(&SheetRequest::new("main", "CEK IOAN"));
        let cropped = loader.load(&SheetRequest::new("main", "CEK IOAN").with_range("A1:B3"));

        assert_eq!(cropped.column_names(), vec!["TEKNISI", "QTY"]);
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_refetch_after_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(MemorySource::new().with_sheet("main", "CEK IOAN", sample()));
        let clock = Arc::new(ManualClock::new());
        let loader = loader(source.clone(), clock.clone(), dir.path());
        let request = SheetRequest::new("main", "CEK IOAN");

        loader.load(&request);
        source.set_sheet("main", "CEK IOAN", grid(&[&["TEKNISI"], &["Budi"]]));
        clock.advance(Duration::from_secs(61));
        let table = loader.load(&request);

        assert_eq!(source.fetch_count(), 2);
        assert_eq!(table.column_names(), vec!["TEKNISI"]);
    }

    #[test]
    fn test_failure_returns_empty_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(MemorySource::new().with_sheet("main", "CEK IOAN", sample()));
        let loader = loader(source.clone(), Arc::new(ManualClock::new()), dir.path());
        let request = SheetRequest::new("main", "CEK PSB");

        let mut reported = None;
        let table = loader.load_or_report(&request, |e| reported = Some(e.to_string()));
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
        assert_eq!(reported.as_deref(), Some("Sheet not found: CEK PSB"));

        // Failures are not cached
        loader.load(&request);
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_empty_sheet_gives_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(MemorySource::new().with_sheet("main", "EMPTY", Vec::new()));
        let loader = loader(source, Arc::new(ManualClock::new()), dir.path());
        let table = loader.try_load(&SheetRequest::new("main", "EMPTY")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_credentials_blocks_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(
            MemorySource::new()
                .requiring_credentials()
                .with_sheet("main", "CEK IOAN", sample()),
        );
        let loader = loader(source.clone(), Arc::new(ManualClock::new()), dir.path());

        let result = loader.try_load(&SheetRequest::new("main", "CEK IOAN"));
        assert!(matches!(result, Err(LoadError::Credentials(_))));
        assert_eq!(source.fetch_count(), 0);
    }

    #[test]
    fn test_credentials_from_key_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("credentials.json"),
            r#"{"type":"service_account","project_id":"dash","private_key":"k","client_email":"svc@dash"}"#,
        )
        .unwrap();
        let resolver = no_credentials(dir.path());
        assert_eq!(resolver.resolve().unwrap().origin, CredentialOrigin::KeyFile);

        let source = Arc::new(
            MemorySource::new()
                .requiring_credentials()
                .with_sheet("main", "CEK IOAN", sample()),
        );
        let loader = Loader::new(Box::new(source.clone()), resolver);
        assert_eq!(loader.load(&SheetRequest::new("main", "CEK IOAN")).row_count(), 2);
        assert_eq!(loader.cache_ttl(), DEFAULT_TTL);
    }
}
