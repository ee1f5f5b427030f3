//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the table model.
//! CONTEXT: Re-exports public types and modules for use by the loader,
//! the pivot engine and the dashboard.

pub mod cell;
pub mod coord;
pub mod headers;
pub mod highlight;
pub mod numeric;
pub mod table;

// Re-export commonly used types at the crate root
pub use cell::{format_number, CellValue};
pub use coord::{coord_to_a1, col_to_index, index_to_col, parse_cell_ref, CellCoord, CellRange, RangeError};
pub use headers::{clean_header, dedupe_headers};
pub use highlight::{classify, classify_value, RowStyle, TARGET_THRESHOLD};
pub use numeric::{
    cell_as_number, coerce_number_or_zero, infer_column_type, is_all_digits, parse_decimal_comma,
    parse_number, tag_column, ColumnType,
};
pub use table::{Column, DataTable, RowRef, TableError};
