//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns a table into a cross-tab.
//!
//! Algorithm:
//! 1. Resolve the row, column and value columns named by the `PivotSpec`
//! 2. Read each source row's value (coerced to a number unless counting)
//! 3. Accumulate per (row key, column key), per row margin, per column
//!    margin and for the whole table in a single pass
//! 4. Lay out the axes in natural key order, then apply axis ordering
//!    (dates, month names) with the Grand Total entries pinned last
//! 5. Fill the dense value grid; missing combinations are 0

use rustc_hash::FxHashMap;

use engine::{coerce_number_or_zero, CellValue, Column, DataTable};

use crate::aggregate::{AggregateAccumulator, AxisValue, GroupKey};
use crate::definition::PivotSpec;
use crate::error::PivotError;
use crate::ordering::ordering_permutation;
use crate::view::{AxisLabel, PivotResult};

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// The main calculation engine for one pivot.
pub struct PivotCalculator<'a> {
    spec: &'a PivotSpec,
    row_columns: Vec<&'a Column>,
    col_columns: Vec<&'a Column>,
    value_column: &'a Column,

    cells: FxHashMap<(GroupKey, GroupKey), AggregateAccumulator>,
    row_margins: FxHashMap<GroupKey, AggregateAccumulator>,
    col_margins: FxHashMap<GroupKey, AggregateAccumulator>,
    total: AggregateAccumulator,
}

impl<'a> PivotCalculator<'a> {
    /// Resolves every column the `PivotSpec` names.
    pub fn new(table: &'a DataTable, spec: &'a PivotSpec) -> Result<Self, PivotError> {
        spec.validate()?;

        let resolve = |name: &String| {
            table
                .column(name)
                .ok_or_else(|| PivotError::UnknownColumn(name.clone()))
        };

        let row_columns = spec.rows.iter().map(resolve).collect::<Result<Vec<_>, _>>()?;
        let col_columns = spec.columns.iter().map(resolve).collect::<Result<Vec<_>, _>>()?;
        let value_column = resolve(&spec.values)?;

        Ok(PivotCalculator {
            spec,
            row_columns,
            col_columns,
            value_column,
            cells: FxHashMap::default(),
            row_margins: FxHashMap::default(),
            col_margins: FxHashMap::default(),
            total: AggregateAccumulator::new(),
        })
    }

    /// Executes the full calculation and returns the result grid.
    pub fn calculate(mut self, row_count: usize) -> PivotResult {
        // Step 1: single pass over the source rows
        for row in 0..row_count {
            self.accumulate_row(row);
        }

        // Step 2: axes in natural key order
        let mut row_keys: Vec<GroupKey> = self.row_margins.keys().cloned().collect();
        row_keys.sort();
        let mut col_keys: Vec<GroupKey> = self.col_margins.keys().cloned().collect();
        col_keys.sort();

        // Step 3: semantic reordering of each axis
        let row_keys = reorder_keys(row_keys);
        let has_columns = !self.col_columns.is_empty();
        let col_keys = if has_columns {
            reorder_keys(col_keys)
        } else {
            Vec::new()
        };

        // Step 4: dense grid with margins
        self.generate_result(row_keys, col_keys)
    }

    fn accumulate_row(&mut self, row: usize) {
        let Some(row_key) = key_for_row(&self.row_columns, row) else {
            return;
        };
        let Some(col_key) = key_for_row(&self.col_columns, row) else {
            return;
        };

        let value_column = self.value_column;
        let value = &value_column.values[row];
        let aggregation = self.spec.aggregation;
        let add = |acc: &mut AggregateAccumulator| {
            if aggregation.is_numeric() {
                acc.add_number(coerce_number_or_zero(value));
            } else if !matches!(value, CellValue::Empty) {
                acc.add_non_number();
            }
        };

        add(self
            .cells
            .entry((row_key.clone(), col_key.clone()))
            .or_default());
        add(self.row_margins.entry(row_key).or_default());
        add(self.col_margins.entry(col_key).or_default());
        add(&mut self.total);
    }

    fn generate_result(&self, row_keys: Vec<GroupKey>, col_keys: Vec<GroupKey>) -> PivotResult {
        let aggregation = self.spec.aggregation;
        let has_columns = !self.col_columns.is_empty();
        let aggregate_of = |acc: Option<&AggregateAccumulator>| acc.map_or(0.0, |a| a.compute(aggregation));

        let mut values = Vec::with_capacity(row_keys.len() + 1);
        for row_key in &row_keys {
            let row_margin = aggregate_of(self.row_margins.get(row_key));
            let mut line: Vec<f64> = Vec::with_capacity(col_keys.len() + 1);
            if has_columns {
                for col_key in &col_keys {
                    line.push(aggregate_of(self.cells.get(&(row_key.clone(), col_key.clone()))));
                }
            }
            line.push(row_margin);
            values.push(line);
        }

        let mut total_line: Vec<f64> = Vec::with_capacity(col_keys.len() + 1);
        if has_columns {
            for col_key in &col_keys {
                total_line.push(aggregate_of(self.col_margins.get(col_key)));
            }
        }
        total_line.push(self.total.compute(aggregation));
        values.push(total_line);

        let mut rows: Vec<AxisLabel> = row_keys.iter().map(key_label).collect();
        rows.push(AxisLabel::grand_total(self.row_columns.len()));

        let columns: Vec<AxisLabel> = if has_columns {
            let mut columns: Vec<AxisLabel> = col_keys.iter().map(key_label).collect();
            columns.push(AxisLabel::grand_total(self.col_columns.len()));
            columns
        } else {
            vec![AxisLabel::new(vec![self.spec.values.clone()])]
        };

        PivotResult {
            row_fields: self.spec.rows.clone(),
            column_fields: self.spec.columns.clone(),
            value_field: self.spec.values.clone(),
            aggregation,
            rows,
            columns,
            values,
        }
    }
}

/// Builds the key of one source row for an axis. None when any key cell is empty.
fn key_for_row(columns: &[&Column], row: usize) -> Option<GroupKey> {
    columns
        .iter()
        .map(|c| AxisValue::from_cell(&c.values[row]))
        .collect()
}

fn key_label(key: &GroupKey) -> AxisLabel {
    AxisLabel::new(key.iter().map(AxisValue::label).collect())
}

/// Applies axis ordering to keys already in natural order.
/// Multi-level keys are detected on their levels joined by a space.
fn reorder_keys(keys: Vec<GroupKey>) -> Vec<GroupKey> {
    let labels: Vec<String> = keys
        .iter()
        .map(|k| k.iter().map(AxisValue::label).collect::<Vec<_>>().join(" "))
        .collect();
    let order = ordering_permutation(&labels);

    let mut slots: Vec<Option<GroupKey>> = keys.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Computes a pivot of `table` as described by `spec`.
/// This is the main entry point for the calculation engine.
pub fn compute(table: &DataTable, spec: &PivotSpec) -> Result<PivotResult, PivotError> {
    let calculator = PivotCalculator::new(table, spec)?;
    let result = calculator.calculate(table.row_count());
    log::debug!(
        "pivot {} rows={} cols={}",
        spec.title(),
        result.rows.len(),
        result.columns.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{AggregationType, GRAND_TOTAL};
    use engine::Column;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_table() -> DataTable {
        DataTable::from_columns(vec![
            Column::text("BULAN", &["MARET", "JANUARI", "FEBRUARI", "JANUARI", "MARET"]),
            Column::text("STO", &["TDS", "KNG", "TDS", "TDS", "KNG"]),
            Column::text("QTY", &["10", "abc", "20", "5", "1"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_count_single_row_key() {
        let table = DataTable::from_columns(vec![
            Column::text("K", &["A", "B", "A"]),
            Column::text("V", &["x", "y", "z"]),
        ])
        .unwrap();
        let spec = PivotSpec::new(strings(&["K"]), "V", AggregationType::Count);
        let result = compute(&table, &spec).unwrap();

        let labels: Vec<String> = result.rows.iter().map(|r| r.parts[0].clone()).collect();
        assert_eq!(labels, vec!["A", "B", GRAND_TOTAL]);
        assert_eq!(result.values, vec![vec![2.0], vec![1.0], vec![3.0]]);
        assert_eq!(result.columns.len(), 1);
        assert!(!result.has_column_margin());
    }

    #[test]
    fn test_sum_coerces_non_numeric_to_zero() {
        let table = DataTable::from_columns(vec![
            Column::text("K", &["A", "A", "A"]),
            Column::text("V", &["10", "abc", "20"]),
        ])
        .unwrap();
        let spec = PivotSpec::new(strings(&["K"]), "V", AggregationType::Sum);
        let result = compute(&table, &spec).unwrap();
        assert_eq!(result.value(&["A"], &["V"]), Some(30.0));
    }

    #[test]
    fn test_mean_counts_coerced_zeros() {
        let table = DataTable::from_columns(vec![
            Column::text("K", &["A", "A", "A"]),
            Column::text("V", &["10", "abc", "20"]),
        ])
        .unwrap();
        let spec = PivotSpec::new(strings(&["K"]), "V", AggregationType::Mean);
        let result = compute(&table, &spec).unwrap();
        assert_eq!(result.value(&["A"], &["V"]), Some(10.0));
    }

    #[test]
    fn test_cross_tab_with_margins() {
        let table = create_test_table();
        let spec = PivotSpec::new(strings(&["BULAN"]), "QTY", AggregationType::Sum)
            .with_columns(strings(&["STO"]));
        let result = compute(&table, &spec).unwrap();

        let rows: Vec<&str> = result.rows.iter().map(|r| r.parts[0].as_str()).collect();
        assert_eq!(rows, vec!["JANUARI", "FEBRUARI", "MARET", GRAND_TOTAL]);
        let cols: Vec<&str> = result.columns.iter().map(|c| c.parts[0].as_str()).collect();
        assert_eq!(cols, vec!["KNG", "TDS", GRAND_TOTAL]);

        // JANUARI: KNG "abc" -> 0, TDS 5
        assert_eq!(result.values[0], vec![0.0, 5.0, 5.0]);
        // FEBRUARI: missing KNG filled with 0
        assert_eq!(result.values[1], vec![0.0, 20.0, 20.0]);
        assert_eq!(result.values[2], vec![1.0, 10.0, 11.0]);
        assert_eq!(result.grand_total_row(), Some(&[1.0, 35.0, 36.0][..]));
    }

    #[test]
    fn test_month_year_rows_cross_year_boundary() {
        let table = DataTable::from_columns(vec![
            Column::text("PERIODE", &["Jan 2025", "Dec 2024", "Feb 2025", "Dec 2024"]),
            Column::text("QTY", &["1", "2", "3", "4"]),
        ])
        .unwrap();
        let spec = PivotSpec::new(strings(&["PERIODE"]), "QTY", AggregationType::Sum);
        let result = compute(&table, &spec).unwrap();

        let rows: Vec<&str> = result.rows.iter().map(|r| r.parts[0].as_str()).collect();
        assert_eq!(rows, vec!["Dec 2024", "Jan 2025", "Feb 2025", GRAND_TOTAL]);
        assert_eq!(result.value(&["Dec 2024"], &["QTY"]), Some(6.0));
    }

    #[test]
    fn test_margins_use_source_rows_for_max() {
        let table = create_test_table();
        let spec = PivotSpec::new(strings(&["STO"]), "QTY", AggregationType::Max)
            .with_columns(strings(&["BULAN"]));
        let result = compute(&table, &spec).unwrap();
        assert_eq!(result.value(&[GRAND_TOTAL], &[GRAND_TOTAL]), Some(20.0));
        assert_eq!(result.value(&["KNG"], &[GRAND_TOTAL]), Some(1.0));
    }

    #[test]
    fn test_multi_level_rows() {
        let table = create_test_table();
        let spec = PivotSpec::new(strings(&["BULAN", "STO"]), "QTY", AggregationType::Count);
        let result = compute(&table, &spec).unwrap();
        assert_eq!(result.rows[0].parts, vec!["JANUARI", "KNG"]);
        assert_eq!(result.rows[1].parts, vec!["JANUARI", "TDS"]);
        let last = result.rows.last().unwrap();
        assert!(last.is_grand_total);
        assert_eq!(last.parts, vec![GRAND_TOTAL, ""]);
        assert_eq!(result.grand_total_row(), Some(&[5.0][..]));
    }

    #[test]
    fn test_no_row_fields() {
        let table = create_test_table();
        let spec = PivotSpec::new(Vec::new(), "QTY", AggregationType::Sum);
        assert_eq!(compute(&table, &spec), Err(PivotError::NoRowFields));
    }

    #[test]
    fn test_unknown_column() {
        let table = create_test_table();
        let spec = PivotSpec::new(strings(&["WITEL"]), "QTY", AggregationType::Sum);
        assert_eq!(
            compute(&table, &spec),
            Err(PivotError::UnknownColumn("WITEL".to_string()))
        );
    }

    #[test]
    fn test_compute_is_idempotent() {
        let table = create_test_table();
        let spec = PivotSpec::new(strings(&["STO"]), "QTY", AggregationType::Mean)
            .with_columns(strings(&["BULAN"]));
        let first = compute(&table, &spec).unwrap();
        let second = compute(&table, &spec).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_numeric_keys_are_skipped() {
        let table = DataTable::from_grid(vec![
            strings(&["TAHUN", "V"]),
            strings(&["2024", "1"]),
            strings(&["", "1"]),
            strings(&["2025", "1"]),
        ]);
        let spec = PivotSpec::new(strings(&["TAHUN"]), "V", AggregationType::Count);
        let result = compute(&table, &spec).unwrap();
        let rows: Vec<&str> = result.rows.iter().map(|r| r.parts[0].as_str()).collect();
        assert_eq!(rows, vec!["2024", "2025", GRAND_TOTAL]);
        assert_eq!(result.grand_total_row(), Some(&[2.0][..]));
    }

    #[test]
    fn test_empty_table_has_only_grand_total() {
        let table = DataTable::from_columns(vec![
            Column::text("K", &[] as &[&str]),
            Column::text("V", &[] as &[&str]),
        ])
        .unwrap();
        let spec = PivotSpec::new(strings(&["K"]), "V", AggregationType::Sum);
        let result = compute(&table, &spec).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.values, vec![vec![0.0]]);
    }
}
