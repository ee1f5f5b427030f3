//! FILENAME: app/src/lib.rs
// PURPOSE: Dashboard library: navigation, pages, presenters and configuration.
// CONTEXT: The binary in main.rs wires these to the terminal.

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod pages;
pub mod present;
pub mod view;

pub use config::{ConfigError, DashboardConfig, Tab};
pub use dispatch::{dispatch, normalize_key_column, AppContext, FilterSelection, PivotSettings};
pub use logging::{get_log_path, init_log_file, next_seq, write_log};
pub use pages::{back_label, menu, DashboardDef, MenuEntry};
pub use present::{Presenter, RecordingPresenter, Rendered, TableView, TerminalPresenter};
pub use view::{transition, Action, Command, DashboardPage, Division, View};

/// Runs one navigation step: applies `action` and renders the new view.
pub fn step(view: View, action: Action, ctx: &AppContext, presenter: &mut dyn Presenter) -> View {
    let next = transition(view, action);
    log_debug!("NAV", "{} -> {}", view, next);
    dispatch(next, ctx, presenter);
    next
}
