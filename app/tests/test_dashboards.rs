//! FILENAME: tests/test_dashboards.rs
//! Integration tests for the standard dashboards and technician pages.

mod common;

use common::{grid, TestHarness};
use dashboard_lib::{DashboardPage, Division, Tab, View};

// ============================================================================
// STANDARD DASHBOARDS
// ============================================================================

#[test]
fn test_ioan_sla_highlights_below_target() {
    let mut harness = TestHarness::with_sample_data();
    harness.open(View::Dashboard(DashboardPage::IoanSla));

    assert_eq!(harness.presenter.titles(), vec!["Dashboard Performansi SLA Imbal Jasa IOAN"]);
    let table = harness.only_table();
    assert_eq!(table.headers, vec!["NO", "STO", "TTR", "SCORE"]);
    assert_eq!(table.rows[0], vec!["1", "TDS", "12", "98.50"]);
    assert_eq!(table.rows[1][3], "101.00");
    // "N/A" is coerced to 0 before highlighting
    assert_eq!(table.rows[2][3], "0.00");
    assert_eq!(table.flagged_rows(), vec![0, 2]);
}

#[test]
fn test_ioan_sub_ranges_are_separate_blocks() {
    let mut harness = TestHarness::with_sample_data();

    harness.open(View::Dashboard(DashboardPage::IoanMsaWsa));
    let table = harness.only_table().clone();
    assert_eq!(table.headers, vec!["WITEL", "MSA", "ACHIEVEMENT"]);
    assert_eq!(table.rows[1], vec!["SUMEDANG", "35", "87.25"]);
    assert_eq!(table.flagged_rows(), vec![1]);

    // PI LATEN has no ACHIEVEMENT column and is shown unstyled
    harness.open(View::Dashboard(DashboardPage::PiLaten));
    let table = harness.only_table();
    assert_eq!(table.headers, vec!["TEKNISI", "PI", "LATEN"]);
    assert!(table.flagged_rows().is_empty());
}

#[test]
fn test_psb_kpi_reads_its_range() {
    let mut harness = TestHarness::with_sample_data();
    harness.open(View::Dashboard(DashboardPage::PsbKpi));
    let table = harness.only_table();
    assert_eq!(table.headers[0], "KPI");
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][4], "94.70");
    assert_eq!(table.flagged_rows(), vec![0]);
}

#[test]
fn test_b2b_decimal_comma() {
    let mut harness = TestHarness::with_sample_data();
    harness.open(View::Dashboard(DashboardPage::B2b));
    let table = harness.only_table();
    assert_eq!(table.rows[0], vec!["PT A", "99.99"]);
    assert_eq!(table.rows[1], vec!["PT B", "100.00"]);
    assert_eq!(table.flagged_rows(), vec![0]);
}

#[test]
fn test_missing_source_reports_and_warns() {
    let mut harness = TestHarness::new();
    harness.open(View::Dashboard(DashboardPage::IoanSla));

    assert_eq!(
        harness.presenter.errors(),
        vec!["Terjadi Kesalahan Koneksi: Source not found: main"]
    );
    assert_eq!(harness.presenter.warnings(), vec!["Data tidak ditemukan di tab: CEK IOAN"]);
    assert!(harness.presenter.tables().is_empty());
}

#[test]
fn test_header_only_tab_is_a_warning() {
    let mut harness = TestHarness::new();
    harness.set_tab(Tab::B2b, grid(&[&["PELANGGAN", "SCORE"]]));
    harness.open(View::Dashboard(DashboardPage::B2b));
    assert!(harness.presenter.errors().is_empty());
    assert_eq!(harness.presenter.warnings(), vec!["Data tidak ditemukan di tab: Data B2B"]);
}

// ============================================================================
// CACHE
// ============================================================================

#[test]
fn test_reopening_within_window_uses_cache() {
    let mut harness = TestHarness::with_sample_data();
    let page = View::Dashboard(DashboardPage::IoanSla);

    harness.open(page);
    let first = harness.only_table().clone();
    harness.advance(30);
    harness.open(page);
    assert_eq!(harness.only_table(), &first);
    assert_eq!(harness.source.fetch_count(), 1);

    harness.advance(31);
    harness.open(page);
    assert_eq!(harness.source.fetch_count(), 2);
}

#[test]
fn test_same_tab_other_range_fetches_again() {
    let mut harness = TestHarness::with_sample_data();
    harness.open(View::Dashboard(DashboardPage::IoanSla));
    harness.open(View::Dashboard(DashboardPage::IoanMsaWsa));
    assert_eq!(harness.source.fetch_count(), 2);
}

// ============================================================================
// TECHNICIAN PAGES
// ============================================================================

#[test]
fn test_technician_slices_and_clean_headers() {
    let mut harness = TestHarness::with_sample_data();

    harness.open(View::TechnicianDetail(Division::Ioan));
    assert_eq!(harness.presenter.titles(), vec!["Data Teknisi - IOAN"]);
    let table = harness.only_table();
    assert_eq!(table.headers, vec!["NAMA", "NIK", "STO"]);
    assert_eq!(
        table.rows,
        vec![vec!["Andi", "2001", "KNG"], vec!["Rina", "2002", "TDS"]]
    );

    harness.open(View::TechnicianDetail(Division::B2b));
    let names: Vec<&str> = harness.only_table().rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(names, vec!["Budi", "Joko"]);

    harness.open(View::TechnicianDetail(Division::Psb));
    assert_eq!(harness.only_table().rows.len(), 3);
    // All three pages share one cached load
    assert_eq!(harness.source.fetch_count(), 1);
}

#[test]
fn test_technician_sheet_too_narrow() {
    let mut harness = TestHarness::new();
    harness.set_tab(Tab::Technicians, grid(&[&["NAMA", "NIK"], &["Budi", "1"]]));
    harness.open(View::TechnicianDetail(Division::Psb));
    assert_eq!(
        harness.presenter.errors(),
        vec!["Gagal memotong kolom: sheet hanya punya 2 kolom"]
    );
}

#[test]
fn test_empty_technician_sheet() {
    let mut harness = TestHarness::new();
    harness.open(View::TechnicianDetail(Division::Ioan));
    assert_eq!(harness.presenter.warnings(), vec!["Data teknisi kosong."]);
}
