//! FILENAME: core/persistence/src/workbook.rs
//! PURPOSE: Sheet source backed by local .xlsx workbooks (calamine).
//! CONTEXT: `source_id` names `<data_dir>/<source_id>.xlsx` and `location_id`
//! the worksheet. Cells come back as display strings: dates day first
//! (`%d/%m/%Y`), whole numbers without `.0`.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::Timelike;
use engine::format_number;

use crate::credentials::Credentials;
use crate::source::{crop_grid, trim_grid, RawGrid, SheetRequest, SheetSource};
use crate::LoadError;

/// Serves sheets from `.xlsx` workbooks in a data directory.
/// The source id names the workbook (with or without extension) and the
/// location names the sheet.
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    data_dir: PathBuf,
}

impl WorkbookSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        WorkbookSource {
            data_dir: data_dir.into(),
        }
    }

    pub fn workbook_path(&self, source_id: &str) -> PathBuf {
        let file = if source_id.to_lowercase().ends_with(".xlsx") {
            source_id.to_string()
        } else {
            format!("{}.xlsx", source_id)
        };
        self.data_dir.join(file)
    }
}

impl SheetSource for WorkbookSource {
    fn fetch(&self, _credentials: Option<&Credentials>, request: &SheetRequest) -> Result<RawGrid, LoadError> {
        let range = request.cell_range()?;
        let path = self.workbook_path(&request.source_id);
        if !path.exists() {
            return Err(LoadError::SourceNotFound(path.display().to_string()));
        }

        let grid = read_sheet(&path, &request.location)?;
        Ok(match range {
            Some(range) => crop_grid(&grid, &range),
            None => grid,
        })
    }

    fn requires_credentials(&self) -> bool {
        false
    }
}

/// Reads a whole sheet as strings, anchored at A1.
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<RawGrid, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
        return Err(LoadError::SheetNotFound(sheet_name.to_string()));
    }

    let range = workbook.worksheet_range(sheet_name)?;
    let (end_row, end_col) = match range.end() {
        Some(end) => end,
        None => return Ok(Vec::new()),
    };

    let mut grid: RawGrid = Vec::with_capacity(end_row as usize + 1);
    for row in 0..=end_row {
        let line = (0..=end_col)
            .map(|col| range.get_value((row, col)).map(cell_text).unwrap_or_default())
            .collect();
        grid.push(line);
    }

    Ok(trim_grid(grid))
}

/// Renders a cell the way a sheet UI shows it.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) if d.num_seconds_from_midnight() == 0 => d.format("%d/%m/%Y").to_string(),
            Some(d) => d.format("%d/%m/%Y %H:%M:%S").to_string(),
            None => format_number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
