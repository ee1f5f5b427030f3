//! FILENAME: core/engine/src/table.rs
//! PURPOSE: The typed, column-oriented table produced by every load.
//! CONTEXT: A `DataTable` is an ordered list of named columns of equal length.
//! Names are unique after loading (repeats carry a numeric suffix) and each
//! column is tagged Text or Number exactly once, when the table is built.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::CellValue;
use crate::headers::{clean_header, dedupe_headers};
use crate::numeric::{tag_column, ColumnType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Column not found: {0}")]
    UnknownColumn(String),

    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// A single named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            column_type,
            values,
        }
    }

    /// Builds a text column from string slices.
    pub fn text<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Column::new(
            name,
            ColumnType::Text,
            values.iter().map(|v| CellValue::text(v.as_ref())).collect(),
        )
    }

    /// Builds a numeric column.
    pub fn number(name: impl Into<String>, values: &[f64]) -> Self {
        Column::new(
            name,
            ColumnType::Number,
            values.iter().map(|v| CellValue::Number(*v)).collect(),
        )
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a DataTable,
    index: usize,
}

impl<'a> RowRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value in the named column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.table
            .column(column)
            .and_then(|c| c.values.get(self.index))
    }

    pub fn values(&self) -> impl Iterator<Item = &'a CellValue> + 'a {
        let index = self.index;
        self.table.columns.iter().map(move |c| &c.values[index])
    }

    pub fn len(&self) -> usize {
        self.table.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.columns.is_empty()
    }
}

/// Ordered collection of equally long columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColumnList")]
pub struct DataTable {
    columns: Vec<Column>,
}

/// Serialized shape of a table; checked by `from_columns` on the way in.
#[derive(Deserialize)]
struct ColumnList {
    columns: Vec<Column>,
}

impl TryFrom<ColumnList> for DataTable {
    type Error = TableError;

    fn try_from(list: ColumnList) -> Result<Self, Self::Error> {
        DataTable::from_columns(list.columns)
    }
}

impl DataTable {
    pub fn new() -> Self {
        DataTable { columns: Vec::new() }
    }

    /// Builds a table from columns, checking that all lengths agree.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns {
                if column.values.len() != expected {
                    return Err(TableError::RaggedColumn {
                        name: column.name.clone(),
                        expected,
                        actual: column.values.len(),
                    });
                }
            }
        }
        Ok(DataTable { columns })
    }

    /// Builds a table from a raw grid whose first row holds the headers.
    ///
    /// Headers are trimmed and deduplicated. Short rows are padded with empty
    /// text and cells past the header width are dropped. Every column is then
    /// tagged Text or Number.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let mut rows = grid.into_iter();
        let headers = match rows.next() {
            Some(h) => dedupe_headers(&h),
            None => return DataTable::new(),
        };

        let width = headers.len();
        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); width];
        let mut dropped_cells = 0usize;

        for row in rows {
            let row_len = row.len();
            if row_len > width {
                dropped_cells += row_len - width;
            }
            let mut cells = row.into_iter();
            for column in raw_columns.iter_mut() {
                column.push(cells.next().unwrap_or_default());
            }
        }

        if dropped_cells > 0 {
            log::debug!("dropped {} cells beyond header width {}", dropped_cells, width);
        }

        let columns = headers
            .into_iter()
            .zip(raw_columns)
            .map(|(name, raw)| {
                let (column_type, values) = tag_column(raw);
                Column::new(name, column_type, values)
            })
            .collect();

        DataTable { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// True when the table has no columns or no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        if index < self.row_count() {
            Some(RowRef { table: self, index })
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        (0..self.row_count()).map(move |index| RowRef { table: self, index })
    }

    /// Positional column slice `[start, end)`, clamped to the table width.
    pub fn slice_columns(&self, start: usize, end: usize) -> DataTable {
        let end = end.min(self.columns.len());
        let start = start.min(end);
        DataTable {
            columns: self.columns[start..end].to_vec(),
        }
    }

    /// Keeps only the rows for which the predicate holds.
    pub fn retain_rows<F>(&self, mut keep: F) -> DataTable
    where
        F: FnMut(RowRef<'_>) -> bool,
    {
        let kept: Vec<usize> = self.rows().filter(|r| keep(*r)).map(|r| r.index).collect();
        self.select_rows(&kept)
    }

    /// Drops rows whose first column is blank after trimming.
    pub fn drop_blank_first_column(&self) -> DataTable {
        match self.columns.first() {
            Some(first) => {
                let first = &first.values;
                self.retain_rows(|r| !first[r.index].display_value().trim().is_empty())
            }
            None => self.clone(),
        }
    }

    /// Keeps rows whose display value in `column` is one of `selected`.
    pub fn filter_in<S: AsRef<str>>(&self, column: &str, selected: &[S]) -> Result<DataTable, TableError> {
        let col = self
            .column(column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))?;
        let wanted: HashSet<&str> = selected.iter().map(|s| s.as_ref()).collect();
        let kept: Vec<usize> = col
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| wanted.contains(v.display_value().as_str()))
            .map(|(i, _)| i)
            .collect();
        Ok(self.select_rows(&kept))
    }

    /// Distinct display values of a column in first-seen order.
    pub fn unique_values(&self, column: &str) -> Result<Vec<String>, TableError> {
        let col = self
            .column(column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))?;
        let mut seen = HashSet::new();
        Ok(col
            .values
            .iter()
            .map(CellValue::display_value)
            .filter(|v| seen.insert(v.clone()))
            .collect())
    }

    /// Keeps the first of any columns sharing an exact name.
    pub fn dedup_column_names(&self) -> DataTable {
        let mut seen = HashSet::new();
        DataTable {
            columns: self
                .columns
                .iter()
                .filter(|c| seen.insert(c.name.clone()))
                .cloned()
                .collect(),
        }
    }

    /// Renames every `<base>_<digits>` column to `<base>` for display.
    /// Row data is untouched and same-named columns are not merged.
    pub fn clean_headers(&self) -> DataTable {
        DataTable {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: clean_header(&c.name),
                    column_type: c.column_type,
                    values: c.values.clone(),
                })
                .collect(),
        }
    }

    /// Replaces the named column's values and type.
    pub fn replace_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        values: Vec<CellValue>,
    ) -> Result<(), TableError> {
        let expected = self.row_count();
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        if values.len() != expected {
            return Err(TableError::RaggedColumn {
                name: name.to_string(),
                expected,
                actual: values.len(),
            });
        }
        column.column_type = column_type;
        column.values = values;
        Ok(())
    }

    fn select_rows(&self, indices: &[usize]) -> DataTable {
        DataTable {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    column_type: c.column_type,
                    values: indices.iter().map(|&i| c.values[i].clone()).collect(),
                })
                .collect(),
        }
    }
}
