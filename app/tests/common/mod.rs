//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use dashboard_lib::{step, Action, AppContext, DashboardConfig, RecordingPresenter, Tab, TableView, View};
use persistence::{ManualClock, MemorySource, RawGrid};

/// Test harness wiring an in-memory source to a recording presenter.
pub struct TestHarness {
    pub source: Arc<MemorySource>,
    pub clock: Arc<ManualClock>,
    pub ctx: AppContext,
    pub presenter: RecordingPresenter,
    pub view: View,
}

impl TestHarness {
    /// Create a harness whose source knows no sheets at all.
    pub fn new() -> Self {
        let source = Arc::new(MemorySource::new());
        let clock = Arc::new(ManualClock::new());
        let ctx = AppContext::with_source(DashboardConfig::default(), Box::new(source.clone()), clock.clone());
        TestHarness {
            source,
            clock,
            ctx,
            presenter: RecordingPresenter::new(),
            view: View::Landing,
        }
    }

    /// Create a harness with every tab populated.
    pub fn with_sample_data() -> Self {
        let harness = Self::new();
        harness.set_tab(Tab::Technicians, TechnicianFixture::grid());
        harness.set_tab(Tab::Ioan, IoanFixture::grid());
        harness.set_tab(Tab::Psb, PsbFixture::grid());
        harness.set_tab(Tab::B2b, B2bFixture::grid());
        harness.set_tab(Tab::RawData, RawDataFixture::grid());
        harness
    }

    pub fn set_tab(&self, tab: Tab, grid: RawGrid) {
        let config = &self.ctx.config;
        self.source.set_sheet(config.spreadsheet_for(tab), config.tab_name(tab), grid);
    }

    /// Clears recorded output, then applies the action and renders.
    pub fn act(&mut self, action: Action) -> View {
        self.presenter.clear();
        self.view = step(self.view, action, &self.ctx, &mut self.presenter);
        self.view
    }

    pub fn open(&mut self, view: View) -> View {
        self.act(Action::Open(view))
    }

    pub fn advance(&self, secs: u64) {
        self.clock.advance(Duration::from_secs(secs));
    }

    /// The single table rendered by the last action.
    pub fn only_table(&self) -> &TableView {
        let tables = self.presenter.tables();
        assert_eq!(tables.len(), 1, "expected one table, got {:?}", self.presenter.items);
        tables[0]
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GRID HELPERS
// ============================================================================

pub fn grid(rows: &[&[&str]]) -> RawGrid {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// Writes `block` into `sheet` with its top-left cell at (row, col),
/// growing the sheet as needed.
pub fn place(sheet: &mut RawGrid, row: usize, col: usize, block: &[&[&str]]) {
    for (r, line) in block.iter().enumerate() {
        let target_row = row + r;
        if sheet.len() <= target_row {
            sheet.resize(target_row + 1, Vec::new());
        }
        let target = &mut sheet[target_row];
        for (c, value) in line.iter().enumerate() {
            let target_col = col + c;
            if target.len() <= target_col {
                target.resize(target_col + 1, String::new());
            }
            target[target_col] = value.to_string();
        }
    }
}

// ============================================================================
// TEST DATA FIXTURES
// ============================================================================

/// Technician roster: B2B in columns A..C, IOAN in D..F, PSB in G..I.
pub struct TechnicianFixture;

impl TechnicianFixture {
    pub fn grid() -> RawGrid {
        grid(&[
            &["NAMA", "NIK", "STO", "NAMA", "NIK", "STO", "NAMA", "NIK", "STO"],
            &["Budi", "1001", "TDS", "Andi", "2001", "KNG", "Sari", "3001", "CJA"],
            &["", "", "", "Rina", "2002", "TDS", "Dewi", "3002", "KNG"],
            &["Joko", "1002", "KNG", "", "", "", "Tono", "3003", "TDS"],
        ])
    }
}

/// CEK IOAN: three blocks on one tab (A1:K29, M9:Q25, T9:Y21).
pub struct IoanFixture;

impl IoanFixture {
    pub fn grid() -> RawGrid {
        let mut sheet = RawGrid::new();
        place(
            &mut sheet,
            0,
            0,
            &[
                &["NO", "STO", "TTR", "SCORE"],
                &["1", "TDS", "12", "98,5"],
                &["2", "KNG", "10", "101"],
                &["3", "CJA", "9", "N/A"],
            ],
        );
        place(
            &mut sheet,
            8,
            12,
            &[
                &["WITEL", "MSA", "ACHIEVEMENT"],
                &["BANDUNG", "40", "100"],
                &["SUMEDANG", "35", "87.25"],
            ],
        );
        place(
            &mut sheet,
            8,
            19,
            &[
                &["TEKNISI", "PI", "LATEN"],
                &["Andi", "3", "2"],
            ],
        );
        sheet
    }
}

/// CEK PSB with the KPI block at A7:F15.
pub struct PsbFixture;

impl PsbFixture {
    pub fn grid() -> RawGrid {
        let mut sheet = grid(&[&["LAPORAN PSB"], &["periode", "2025"]]);
        place(
            &mut sheet,
            6,
            0,
            &[
                &["KPI", "BOBOT", "TARGET", "REAL", "ACHIEVEMENT", "NILAI"],
                &["PS/RE", "30", "95", "90", "94.7", "28.4"],
                &["TTI", "20", "90", "99", "110", "22"],
            ],
        );
        sheet
    }
}

pub struct B2bFixture;

impl B2bFixture {
    pub fn grid() -> RawGrid {
        grid(&[
            &["PELANGGAN", "SCORE"],
            &["PT A", "99,99"],
            &["PT B", "100"],
        ])
    }
}

/// Raw daily PS data for the pivot explorer.
pub struct RawDataFixture;

impl RawDataFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["BULAN", "STO", "JENIS", "QTY", "TGL"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, &'static str, &'static str)> {
        vec![
            ("MARET", "TDS", "AO", "3", "01/03/2025"),
            ("JANUARI", "KNG", "AO", "5", "15/01/2025"),
            ("FEBRUARI", "TDS", "MO", "2", "03/02/2025"),
            ("JANUARI", "TDS", "AO", "4", "20/01/2025"),
            ("MARET", "KNG", "MO", "x", "02/03/2025"),
        ]
    }

    pub fn grid() -> RawGrid {
        let mut rows = vec![Self::headers().iter().map(|s| s.to_string()).collect::<Vec<_>>()];
        for (bulan, sto, jenis, qty, tgl) in Self::data() {
            rows.push(vec![
                bulan.to_string(),
                sto.to_string(),
                jenis.to_string(),
                qty.to_string(),
                tgl.to_string(),
            ]);
        }
        rows
    }
}
