//! FILENAME: app/src/pages.rs
//! PURPOSE: Page catalogue: what each dashboard loads and how menus link pages.

use crate::config::Tab;
use crate::view::{DashboardPage, Division, View};

/// A standard dashboard: one tab (optionally a sub-range) shown as a table,
/// highlighted on `key_column` when that column exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardDef {
    pub title: &'static str,
    pub tab: Tab,
    pub range: Option<&'static str>,
    pub key_column: &'static str,
}

impl DashboardPage {
    pub fn definition(&self) -> DashboardDef {
        match self {
            DashboardPage::PsbKpi => DashboardDef {
                title: "KPI IMBAL JASA PROVISIONING SA TANDES",
                tab: Tab::Psb,
                range: Some("A7:F15"),
                key_column: "ACHIEVEMENT",
            },
            DashboardPage::IoanSla => DashboardDef {
                title: "Performansi SLA Imbal Jasa IOAN",
                tab: Tab::Ioan,
                range: Some("A1:K29"),
                key_column: "SCORE",
            },
            DashboardPage::IoanMsaWsa => DashboardDef {
                title: "Performansi MSA-WSA IOAN",
                tab: Tab::Ioan,
                range: Some("M9:Q25"),
                key_column: "ACHIEVEMENT",
            },
            DashboardPage::PiLaten => DashboardDef {
                title: "PI LATEN",
                tab: Tab::Ioan,
                range: Some("T9:Y21"),
                key_column: "ACHIEVEMENT",
            },
            DashboardPage::B2b => DashboardDef {
                title: "Performansi B2B",
                tab: Tab::B2b,
                range: None,
                key_column: "SCORE",
            },
        }
    }
}

// ============================================================================
// MENUS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Small caption above the button, if any.
    pub group: Option<&'static str>,
    pub label: &'static str,
    pub target: View,
}

impl MenuEntry {
    fn new(group: Option<&'static str>, label: &'static str, target: View) -> Self {
        MenuEntry { group, label, target }
    }
}

/// Heading and entries for the menu views; None for content pages.
pub fn menu(view: View) -> Option<(&'static str, Vec<MenuEntry>)> {
    let menu = match view {
        View::Landing => (
            "Monitoring Dashboard Performansi SA TANDES",
            vec![
                MenuEntry::new(Some("DATA PEGAWAI"), "DAFTAR TEKNISI", View::TechnicianMenu),
                MenuEntry::new(Some("DATA IOAN"), "PERFORMANSI IOAN", View::IoanMenu),
                MenuEntry::new(Some("DATA PSB"), "PERFORMANSI PSB", View::PsbMenu),
                MenuEntry::new(Some("DATA B2B"), "PERFORMANSI B2B", View::Dashboard(DashboardPage::B2b)),
            ],
        ),
        View::TechnicianMenu => (
            "Pilih Kategori Teknisi",
            vec![
                MenuEntry::new(None, "TEKNISI IOAN", View::TechnicianDetail(Division::Ioan)),
                MenuEntry::new(None, "TEKNISI PSB", View::TechnicianDetail(Division::Psb)),
                MenuEntry::new(None, "TEKNISI B2B", View::TechnicianDetail(Division::B2b)),
            ],
        ),
        View::PsbMenu => (
            "Pilih Dashboard PSB",
            vec![
                MenuEntry::new(
                    Some("PSB B2C"),
                    "Dashboard KPI IMBAL JASA PROVISIONING SA TANDES",
                    View::Dashboard(DashboardPage::PsbKpi),
                ),
                MenuEntry::new(Some("ANALISA DATA PS PSB"), "Dashboard Data PS PSB", View::PivotExplorer),
            ],
        ),
        View::IoanMenu => (
            "Pilih Dashboard IOAN",
            vec![
                MenuEntry::new(None, "Performansi SLA Imbal jasa IOAN", View::Dashboard(DashboardPage::IoanSla)),
                MenuEntry::new(None, "Performansi MSA-WSA IOAN", View::Dashboard(DashboardPage::IoanMsaWsa)),
                MenuEntry::new(None, "Performansi PI LATEN", View::Dashboard(DashboardPage::PiLaten)),
            ],
        ),
        _ => return None,
    };
    Some(menu)
}

/// Caption of the back button shown on a page.
pub fn back_label(view: View) -> Option<&'static str> {
    if view == View::Landing {
        return None;
    }
    Some(match view.parent() {
        View::PsbMenu => "Kembali ke Pilihan PSB",
        View::IoanMenu => "Kembali ke Pilihan IOAN",
        View::TechnicianMenu => "Kembali ke Pilihan Teknisi",
        _ => "Kembali ke Menu Utama",
    })
}
