//! FILENAME: app/src/dispatch.rs
//! PURPOSE: Renders exactly one view through a presenter.
//! CONTEXT: Every failure ends up as a presenter message. Nothing here panics
//! or returns an error to the caller.

use std::sync::Arc;

use engine::{parse_decimal_comma, CellValue, ColumnType, DataTable, TableError};
use persistence::{Clock, CredentialResolver, Loader, SheetSource, SystemClock, WorkbookSource};
use pivot_engine::{compute, plan_chart, to_chart_series, AggregationType, ChartKind, ChartWarning, PivotSpec};

use crate::config::{DashboardConfig, Tab};
use crate::pages::{back_label, menu};
use crate::present::{Presenter, TableView};
use crate::view::{DashboardPage, Division, View};
use crate::{log_debug, log_enter, log_exit, log_info, log_warn};

// ============================================================================
// CONTEXT
// ============================================================================

/// Column filter from the pivot explorer's sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub column: String,
    pub values: Vec<String>,
}

/// User choices for the pivot explorer. Unset fields fall back to the
/// table's first column (rows) and second column (values).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotSettings {
    pub rows: Option<Vec<String>>,
    pub columns: Vec<String>,
    pub values: Option<String>,
    pub aggregation: AggregationType,
    pub chart: ChartKind,
    pub filter: Option<FilterSelection>,
}

impl PivotSettings {
    /// Resolves defaults against `table`. None when no row field is chosen.
    pub fn spec_for(&self, table: &DataTable) -> Option<PivotSpec> {
        let names = table.column_names();
        let rows = match &self.rows {
            Some(rows) => rows.clone(),
            None => names.first().map(|n| vec![n.to_string()]).unwrap_or_default(),
        };
        if rows.is_empty() {
            return None;
        }
        let values = match &self.values {
            Some(values) => values.clone(),
            None => names.get(1).or_else(|| names.first())?.to_string(),
        };
        Some(PivotSpec::new(rows, values, self.aggregation).with_columns(self.columns.clone()))
    }
}

pub struct AppContext {
    pub config: DashboardConfig,
    pub loader: Loader,
    pub pivot: PivotSettings,
}

impl AppContext {
    /// Context reading workbooks from the configured data directory.
    pub fn new(config: DashboardConfig) -> Self {
        let source = WorkbookSource::new(config.data_dir.clone());
        Self::with_source(config, Box::new(source), Arc::new(SystemClock::new()))
    }

    pub fn with_source(config: DashboardConfig, source: Box<dyn SheetSource>, clock: Arc<dyn Clock>) -> Self {
        let credentials = CredentialResolver::new(config.credentials.clone());
        let loader = Loader::new(source, credentials).with_cache(config.cache_ttl(), clock);
        AppContext {
            config,
            loader,
            pivot: PivotSettings::default(),
        }
    }

    fn load(&self, tab: Tab, range: Option<&str>, presenter: &mut dyn Presenter) -> DataTable {
        let request = self.config.request(tab, range);
        self.loader.load_or_report(&request, |e| {
            presenter.error(&format!("Terjadi Kesalahan Koneksi: {}", e))
        })
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

pub fn dispatch(view: View, ctx: &AppContext, presenter: &mut dyn Presenter) {
    log_info!("NAV", "dispatch {}", view);

    if let Some(label) = back_label(view) {
        presenter.back_button(label);
    }

    match view {
        View::Landing | View::TechnicianMenu | View::PsbMenu | View::IoanMenu => render_menu(view, presenter),
        View::TechnicianDetail(division) => render_technician_detail(division, ctx, presenter),
        View::Dashboard(page) => render_dashboard(page, ctx, presenter),
        View::PivotExplorer => render_pivot_explorer(ctx, presenter),
    }
}

fn render_menu(view: View, presenter: &mut dyn Presenter) {
    if let Some((heading, entries)) = menu(view) {
        presenter.title(heading);
        presenter.menu(&entries);
    }
}

fn render_technician_detail(division: Division, ctx: &AppContext, presenter: &mut dyn Presenter) {
    presenter.title(&format!("Data Teknisi - {}", division.label()));

    let table = ctx.load(Tab::Technicians, None, presenter);
    if table.is_empty() {
        presenter.warning("Data teknisi kosong.");
        return;
    }

    let (start, end) = division.column_slice();
    let sliced = table.slice_columns(start, end);
    if sliced.column_count() == 0 {
        presenter.error(&format!(
            "Gagal memotong kolom: sheet hanya punya {} kolom",
            table.column_count()
        ));
        return;
    }

    let cleaned = sliced.drop_blank_first_column().clean_headers();
    log_debug!("NAV", "technicians {} rows={}", division.label(), cleaned.row_count());
    presenter.table(&TableView::plain(&cleaned));
}

fn render_dashboard(page: DashboardPage, ctx: &AppContext, presenter: &mut dyn Presenter) {
    let def = page.definition();
    presenter.title(&format!("Dashboard {}", def.title));

    let table = ctx.load(def.tab, def.range, presenter);
    if table.is_empty() {
        presenter.warning(&format!("Data tidak ditemukan di tab: {}", ctx.config.tab_name(def.tab)));
        return;
    }

    if table.column(def.key_column).is_none() {
        presenter.table(&TableView::plain(&table));
        return;
    }

    match normalize_key_column(&table, def.key_column) {
        Ok(normalized) => presenter.table(&TableView::highlighted(&normalized, def.key_column)),
        Err(e) => {
            log_warn!("NAV", "cannot normalise {}: {}", def.key_column, e);
            presenter.table(&TableView::plain(&table));
        }
    }
}

/// Rewrites `key_column` as numbers: decimal commas become points and
/// values that still fail to parse become 0.
pub fn normalize_key_column(table: &DataTable, key_column: &str) -> Result<DataTable, TableError> {
    let column = table
        .column(key_column)
        .ok_or_else(|| TableError::UnknownColumn(key_column.to_string()))?;

    let values = column
        .values
        .iter()
        .map(|v| {
            let n = match v {
                CellValue::Number(n) => *n,
                other => parse_decimal_comma(&other.display_value()).unwrap_or(0.0),
            };
            CellValue::Number(n)
        })
        .collect();

    let mut normalized = table.clone();
    normalized.replace_column(key_column, ColumnType::Number, values)?;
    Ok(normalized)
}

// ============================================================================
// PIVOT EXPLORER
// ============================================================================

fn render_pivot_explorer(ctx: &AppContext, presenter: &mut dyn Presenter) {
    presenter.title("Analisa Data PS PSB");

    let raw = ctx.load(Tab::RawData, None, presenter);
    if raw.is_empty() {
        presenter.warning(&format!(
            "Data tidak ditemukan di tab: {}",
            ctx.config.tab_name(Tab::RawData)
        ));
        return;
    }

    let mut table = raw.dedup_column_names();

    if let Some(filter) = &ctx.pivot.filter {
        table = match apply_filter(&table, filter, presenter) {
            Some(filtered) => filtered,
            None => return,
        };
        if table.is_empty() {
            return;
        }
    }

    let spec = match ctx.pivot.spec_for(&table) {
        Some(spec) => spec,
        None => {
            presenter.info("Silakan pilih minimal satu 'Baris (Rows)' di menu pengaturan.");
            return;
        }
    };

    log_enter!("PIVOT", "compute", "{} rows={}", spec.title(), table.row_count());
    let result = match compute(&table, &spec) {
        Ok(result) => {
            log_exit!("PIVOT", "compute", "rows={} cols={}", result.rows.len(), result.columns.len());
            result
        }
        Err(e) => {
            log_exit!("PIVOT", "compute", "error");
            log_warn!("PIVOT", "compute failed: {}", e);
            presenter.error(&format!("Gagal memproses data: {}", e));
            return;
        }
    };

    presenter.heading(&format!("Hasil Analisa: {}", spec.title()));
    presenter.table(&TableView::from_pivot(&result));

    presenter.heading("Visualisasi Grafik");
    match plan_chart(ctx.pivot.chart, to_chart_series(&result)) {
        Ok(plan) => presenter.chart(&plan),
        Err(ChartWarning::NoData) => presenter.warning("Data tidak cukup untuk membuat grafik."),
        Err(ChartWarning::PieNeedsSingleSeries { .. }) => {
            presenter.warning("Pie Chart hanya untuk data 1 kolom.")
        }
    }
}

/// Applies the sidebar filter. Returns None when the page should stop here.
fn apply_filter(table: &DataTable, filter: &FilterSelection, presenter: &mut dyn Presenter) -> Option<DataTable> {
    if filter.values.is_empty() {
        presenter.warning(&format!(
            "Anda memilih filter '{}' tapi belum memilih isinya.",
            filter.column
        ));
        if let Ok(options) = table.unique_values(&filter.column) {
            presenter.info(&format!("Pilih isi '{}': {}", filter.column, options.join(", ")));
        }
        return None;
    }

    match table.filter_in(&filter.column, &filter.values) {
        Ok(filtered) => {
            presenter.info(&format!("{} baris data ditemukan.", filtered.row_count()));
            Some(filtered)
        }
        Err(e) => {
            presenter.error(&format!("Filter tidak valid: {}", e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Column;

    #[test]
    fn test_normalize_key_column() {
        let table = DataTable::from_columns(vec![
            Column::text("STO", &["TDS", "KNG", "CJA", "BDG"]),
            Column::text("ACHIEVEMENT", &["85,5", "102", "N/A", ""]),
        ])
        .unwrap();
        let normalized = normalize_key_column(&table, "ACHIEVEMENT").unwrap();
        let column = normalized.column("ACHIEVEMENT").unwrap();
        assert_eq!(column.column_type, ColumnType::Number);
        assert_eq!(
            column.values,
            vec![
                CellValue::Number(85.5),
                CellValue::Number(102.0),
                CellValue::Number(0.0),
                CellValue::Number(0.0)
            ]
        );
        assert!(normalize_key_column(&table, "SCORE").is_err());
    }

    #[test]
    fn test_pivot_settings_defaults() {
        let table = DataTable::from_columns(vec![
            Column::text("BULAN", &["JANUARI"]),
            Column::text("STO", &["TDS"]),
        ])
        .unwrap();
        let spec = PivotSettings::default().spec_for(&table).unwrap();
        assert_eq!(spec.rows, vec!["BULAN"]);
        assert_eq!(spec.values, "STO");
        assert_eq!(spec.aggregation, AggregationType::Count);

        let none = PivotSettings {
            rows: Some(Vec::new()),
            ..PivotSettings::default()
        };
        assert!(none.spec_for(&table).is_none());
    }

    #[test]
    fn test_single_column_uses_it_for_values() {
        let table = DataTable::from_columns(vec![Column::text("BULAN", &["JANUARI"])]).unwrap();
        let spec = PivotSettings::default().spec_for(&table).unwrap();
        assert_eq!(spec.values, "BULAN");
    }
}
