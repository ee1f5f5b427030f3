//! FILENAME: app/src/view.rs
//! PURPOSE: Navigation state as a value.
//! CONTEXT: The current page is a `View`. User actions produce the next view
//! through `transition`, which never mutates anything.

use std::fmt;
use std::str::FromStr;

/// Technician groups shown on the technician detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Division {
    Ioan,
    Psb,
    B2b,
}

impl Division {
    pub fn label(&self) -> &'static str {
        match self {
            Division::Ioan => "IOAN",
            Division::Psb => "PSB",
            Division::B2b => "B2B",
        }
    }

    /// Positional column slice `[start, end)` of the technician sheet.
    pub fn column_slice(&self) -> (usize, usize) {
        match self {
            Division::Ioan => (3, 6),
            Division::Psb => (6, 9),
            Division::B2b => (0, 3),
        }
    }
}

/// Standard (single table) dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardPage {
    PsbKpi,
    IoanSla,
    IoanMsaWsa,
    PiLaten,
    B2b,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Landing,
    TechnicianMenu,
    TechnicianDetail(Division),
    PsbMenu,
    IoanMenu,
    Dashboard(DashboardPage),
    PivotExplorer,
}

impl Default for View {
    fn default() -> Self {
        View::Landing
    }
}

impl View {
    pub const ALL: [View; 13] = [
        View::Landing,
        View::TechnicianMenu,
        View::TechnicianDetail(Division::Ioan),
        View::TechnicianDetail(Division::Psb),
        View::TechnicianDetail(Division::B2b),
        View::PsbMenu,
        View::IoanMenu,
        View::Dashboard(DashboardPage::PsbKpi),
        View::Dashboard(DashboardPage::IoanSla),
        View::Dashboard(DashboardPage::IoanMsaWsa),
        View::Dashboard(DashboardPage::PiLaten),
        View::Dashboard(DashboardPage::B2b),
        View::PivotExplorer,
    ];

    /// Where "back" leads. The landing page is its own parent.
    pub fn parent(&self) -> View {
        match self {
            View::Landing | View::TechnicianMenu | View::PsbMenu | View::IoanMenu => View::Landing,
            View::TechnicianDetail(_) => View::TechnicianMenu,
            View::Dashboard(DashboardPage::PsbKpi) | View::PivotExplorer => View::PsbMenu,
            View::Dashboard(DashboardPage::IoanSla)
            | View::Dashboard(DashboardPage::IoanMsaWsa)
            | View::Dashboard(DashboardPage::PiLaten) => View::IoanMenu,
            View::Dashboard(DashboardPage::B2b) => View::Landing,
        }
    }

    /// Stable short name used on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            View::Landing => "landing",
            View::TechnicianMenu => "teknisi",
            View::TechnicianDetail(Division::Ioan) => "teknisi-ioan",
            View::TechnicianDetail(Division::Psb) => "teknisi-psb",
            View::TechnicianDetail(Division::B2b) => "teknisi-b2b",
            View::PsbMenu => "psb",
            View::IoanMenu => "ioan",
            View::Dashboard(DashboardPage::PsbKpi) => "psb-kpi",
            View::Dashboard(DashboardPage::IoanSla) => "ioan-sla",
            View::Dashboard(DashboardPage::IoanMsaWsa) => "ioan-msa-wsa",
            View::Dashboard(DashboardPage::PiLaten) => "pi-laten",
            View::Dashboard(DashboardPage::B2b) => "b2b",
            View::PivotExplorer => "psb-pivot",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        View::ALL
            .iter()
            .copied()
            .find(|v| v.slug() == wanted)
            .ok_or_else(|| format!("Unknown page: {}", s.trim()))
    }
}

// ============================================================================
// TRANSITIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open(View),
    Back,
    Home,
}

pub fn transition(view: View, action: Action) -> View {
    match action {
        Action::Open(target) => target,
        Action::Back => view.parent(),
        Action::Home => View::Landing,
    }
}

/// One line of the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Navigate(Action),
    Quit,
}

impl FromStr for Command {
    type Err = String;

    /// Accepts `open <page>`, `back`, `home`, `quit` (and `exit`), or a bare page name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Err("Empty command".to_string()),
            "back" => Ok(Command::Navigate(Action::Back)),
            "home" => Ok(Command::Navigate(Action::Home)),
            "quit" | "exit" => Ok(Command::Quit),
            "open" if rest.is_empty() => Err("open needs a page name".to_string()),
            "open" => Ok(Command::Navigate(Action::Open(rest.parse()?))),
            _ => Ok(Command::Navigate(Action::Open(line.parse()?))),
        }
    }
}
