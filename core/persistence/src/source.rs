//! FILENAME: core/persistence/src/source.rs
//! PURPOSE: The seam between the loader and wherever sheet cells come from.
//! CONTEXT: A source returns a raw 2D grid of strings whose first row holds
//! headers. `MemorySource` serves fixed grids and counts fetches.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use engine::CellRange;

use crate::credentials::Credentials;
use crate::LoadError;

/// Raw cell grid as returned by a source.
pub type RawGrid = Vec<Vec<String>>;

/// Identifies one block of cells: a source, a named sheet in it, and an
/// optional "A1:K29"-style sub-range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRequest {
    pub source_id: String,
    pub location: String,
    pub range: Option<String>,
}

impl SheetRequest {
    pub fn new(source_id: impl Into<String>, location: impl Into<String>) -> Self {
        SheetRequest {
            source_id: source_id.into(),
            location: location.into(),
            range: None,
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Parses the sub-range, if any.
    pub fn cell_range(&self) -> Result<Option<CellRange>, LoadError> {
        match &self.range {
            Some(r) => Ok(Some(CellRange::parse(r)?)),
            None => Ok(None),
        }
    }
}

impl fmt::Display for SheetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source_id, self.location)?;
        if let Some(range) = &self.range {
            write!(f, "!{}", range)?;
        }
        Ok(())
    }
}

/// Something that can hand out sheet grids.
pub trait SheetSource {
    /// Fetches the requested block. `credentials` is None only when
    /// `requires_credentials` returns false.
    fn fetch(&self, credentials: Option<&Credentials>, request: &SheetRequest) -> Result<RawGrid, LoadError>;

    fn requires_credentials(&self) -> bool {
        true
    }
}

impl<T: SheetSource + ?Sized> SheetSource for Arc<T> {
    fn fetch(&self, credentials: Option<&Credentials>, request: &SheetRequest) -> Result<RawGrid, LoadError> {
        (**self).fetch(credentials, request)
    }

    fn requires_credentials(&self) -> bool {
        (**self).requires_credentials()
    }
}

/// Crops a full-sheet grid (anchored at A1) to `range`, keeping positions
/// outside the grid as empty strings before trimming.
pub fn crop_grid(grid: &RawGrid, range: &CellRange) -> RawGrid {
    let cell = |r: u32, c: u32| -> String {
        grid.get(r as usize)
            .and_then(|row| row.get(c as usize))
            .cloned()
            .unwrap_or_default()
    };
    let cropped = (range.start.0..=range.end.0)
        .map(|r| (range.start.1..=range.end.1).map(|c| cell(r, c)).collect())
        .collect();
    trim_grid(cropped)
}

/// Drops trailing empty cells from each row and trailing empty rows,
/// matching what a sheet API returns for a block.
pub fn trim_grid(mut grid: RawGrid) -> RawGrid {
    for row in grid.iter_mut() {
        while row.last().map_or(false, |c| c.is_empty()) {
            row.pop();
        }
    }
    while grid.last().map_or(false, |r| r.is_empty()) {
        grid.pop();
    }
    grid
}

// ============================================================================
// MEMORY SOURCE
// ============================================================================

/// In-memory sheets keyed by (source, location).
#[derive(Default)]
pub struct MemorySource {
    sheets: Mutex<HashMap<(String, String), RawGrid>>,
    fetches: AtomicUsize,
    needs_credentials: bool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the source refuse to fetch without credentials.
    pub fn requiring_credentials(mut self) -> Self {
        self.needs_credentials = true;
        self
    }

    pub fn with_sheet(self, source_id: &str, location: &str, grid: RawGrid) -> Self {
        self.set_sheet(source_id, location, grid);
        self
    }

    /// Adds or replaces a sheet.
    pub fn set_sheet(&self, source_id: &str, location: &str, grid: RawGrid) {
        if let Ok(mut sheets) = self.sheets.lock() {
            sheets.insert((source_id.to_string(), location.to_string()), grid);
        }
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl SheetSource for MemorySource {
    fn fetch(&self, _credentials: Option<&Credentials>, request: &SheetRequest) -> Result<RawGrid, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let range = request.cell_range()?;
        let sheets = self
            .sheets
            .lock()
            .map_err(|e| LoadError::Source(format!("Lock error: {}", e)))?;

        let known_source = sheets.keys().any(|(s, _)| *s == request.source_id);
        if !known_source {
            return Err(LoadError::SourceNotFound(request.source_id.clone()));
        }

        let grid = sheets
            .get(&(request.source_id.clone(), request.location.clone()))
            .ok_or_else(|| LoadError::SheetNotFound(request.location.clone()))?;

        Ok(match range {
            Some(range) => crop_grid(grid, &range),
            None => grid.clone(),
        })
    }

    fn requires_credentials(&self) -> bool {
        self.needs_credentials
    }
}
