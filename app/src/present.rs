//! FILENAME: app/src/present.rs
//! PURPOSE: Output sinks for rendered pages.
//! CONTEXT: Dispatch only talks to a `Presenter`. The terminal presenter draws
//! aligned text tables and bar charts; the recording presenter keeps every
//! call so tests can inspect what a page produced.

use std::io::Write;

use engine::{format_number, DataTable, RowStyle};
use pivot_engine::{ChartKind, ChartPlan, PivotResult};

use crate::pages::MenuEntry;

// ============================================================================
// TABLE VIEW
// ============================================================================

/// A table ready for display: strings plus one style per row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_styles: Vec<RowStyle>,
}

impl TableView {
    pub fn plain(table: &DataTable) -> Self {
        let rows: Vec<Vec<String>> = table
            .rows()
            .map(|r| r.values().map(|v| v.display_value()).collect())
            .collect();
        TableView {
            headers: table.column_names().iter().map(|s| s.to_string()).collect(),
            row_styles: vec![RowStyle::Normal; rows.len()],
            rows,
        }
    }

    /// Styles rows by `key_column` and shows that column with two decimals.
    /// The key column is expected to be numeric already.
    pub fn highlighted(table: &DataTable, key_column: &str) -> Self {
        let key_index = table.column_index(key_column);
        let rows = table
            .rows()
            .map(|r| {
                r.values()
                    .enumerate()
                    .map(|(i, v)| match (Some(i) == key_index, v.as_number()) {
                        (true, Some(n)) => format!("{:.2}", n),
                        _ => v.display_value(),
                    })
                    .collect()
            })
            .collect();
        TableView {
            headers: table.column_names().iter().map(|s| s.to_string()).collect(),
            rows,
            row_styles: table.rows().map(|r| engine::classify(r, key_column)).collect(),
        }
    }

    pub fn from_pivot(result: &PivotResult) -> Self {
        let (headers, rows) = result.to_string_grid();
        TableView {
            headers,
            row_styles: vec![RowStyle::Normal; rows.len()],
            rows,
        }
    }

    pub fn flagged_rows(&self) -> Vec<usize> {
        self.row_styles
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == RowStyle::BelowTarget)
            .map(|(i, _)| i)
            .collect()
    }
}

// ============================================================================
// PRESENTER
// ============================================================================

pub trait Presenter {
    fn title(&mut self, text: &str);
    fn heading(&mut self, text: &str);
    fn back_button(&mut self, label: &str);
    fn menu(&mut self, entries: &[MenuEntry]);
    fn table(&mut self, table: &TableView);
    fn chart(&mut self, plan: &ChartPlan);
    fn info(&mut self, message: &str);
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

const BAR_WIDTH: f64 = 40.0;

/// Writes pages as plain text.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        TerminalPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            log::warn!("terminal write failed: {}", e);
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn title(&mut self, text: &str) {
        self.line("");
        self.line(&format!("== {} ==", text));
    }

    fn heading(&mut self, text: &str) {
        self.line(&format!("-- {} --", text));
    }

    fn back_button(&mut self, label: &str) {
        self.line(&format!("[back] {}", label));
    }

    fn menu(&mut self, entries: &[MenuEntry]) {
        for entry in entries {
            match entry.group {
                Some(group) => self.line(&format!("  {:<14} {:<50} (open {})", group, entry.label, entry.target)),
                None => self.line(&format!("  {:<50} (open {})", entry.label, entry.target)),
            }
        }
    }

    fn table(&mut self, table: &TableView) {
        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let render = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| pad(c, *w))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        let header = format!("  {}", render(&table.headers));
        let rule = format!("  {}", "-".repeat(header.chars().count().saturating_sub(2)));
        let body: Vec<String> = table
            .rows
            .iter()
            .zip(&table.row_styles)
            .map(|(row, style)| {
                let marker = if *style == RowStyle::BelowTarget { "! " } else { "  " };
                format!("{}{}", marker, render(row))
            })
            .collect();

        self.line(&header);
        self.line(&rule);
        for line in body {
            self.line(&line);
        }
        if !table.flagged_rows().is_empty() {
            self.line("  (! = di bawah target)");
        }
    }

    fn chart(&mut self, plan: &ChartPlan) {
        let kind = match plan.kind {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Pie => "Pie Chart",
        };
        let mut header = format!("{} | x: {} | y: {}", kind, plan.x_axis, plan.y_axis);
        if let Some(series_axis) = &plan.series_axis {
            header.push_str(&format!(" | warna: {}", series_axis));
        }
        self.line(&header);

        let points = &plan.data.points;
        let total: f64 = points.iter().map(|p| p.value).sum();
        let max = points.iter().map(|p| p.value.abs()).fold(0.0_f64, f64::max);
        let label_width = points.iter().map(|p| p.category.chars().count()).max().unwrap_or(0);

        for series in &plan.data.series_names {
            if plan.grouped {
                self.line(&format!("  [{}]", series));
            }
            let lines: Vec<String> = plan
                .data
                .series(series)
                .map(|p| {
                    let value = match plan.kind {
                        ChartKind::Pie if total != 0.0 => {
                            format!("{} ({:.1}%)", format_number(p.value), p.value / total * 100.0)
                        }
                        _ => format_number(p.value),
                    };
                    let bar = if max > 0.0 {
                        "#".repeat((p.value.abs() / max * BAR_WIDTH).round() as usize)
                    } else {
                        String::new()
                    };
                    format!("  {} {} {}", pad(&p.category, label_width), bar, value)
                })
                .collect();
            for line in lines {
                self.line(&line);
            }
        }
    }

    fn info(&mut self, message: &str) {
        self.line(&format!("[i] {}", message));
    }

    fn warning(&mut self, message: &str) {
        self.line(&format!("[!] {}", message));
    }

    fn error(&mut self, message: &str) {
        self.line(&format!("[x] {}", message));
    }
}

// ============================================================================
// RECORDING PRESENTER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Title(String),
    Heading(String),
    BackButton(String),
    Menu(Vec<MenuEntry>),
    Table(TableView),
    Chart(ChartPlan),
    Info(String),
    Warning(String),
    Error(String),
}

/// Keeps everything a page rendered, in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub items: Vec<Rendered>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|i| match i {
                Rendered::Title(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<&TableView> {
        self.items
            .iter()
            .filter_map(|i| match i {
                Rendered::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn charts(&self) -> Vec<&ChartPlan> {
        self.items
            .iter()
            .filter_map(|i| match i {
                Rendered::Chart(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<&str> {
        self.messages(|i| match i {
            Rendered::Info(m) => Some(m),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.messages(|i| match i {
            Rendered::Warning(m) => Some(m),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<&str> {
        self.messages(|i| match i {
            Rendered::Error(m) => Some(m),
            _ => None,
        })
    }

    fn messages<'a, F>(&'a self, pick: F) -> Vec<&'a str>
    where
        F: Fn(&'a Rendered) -> Option<&'a String>,
    {
        self.items.iter().filter_map(pick).map(|s| s.as_str()).collect()
    }
}

impl Presenter for RecordingPresenter {
    fn title(&mut self, text: &str) {
        self.items.push(Rendered::Title(text.to_string()));
    }

    fn heading(&mut self, text: &str) {
        self.items.push(Rendered::Heading(text.to_string()));
    }

    fn back_button(&mut self, label: &str) {
        self.items.push(Rendered::BackButton(label.to_string()));
    }

    fn menu(&mut self, entries: &[MenuEntry]) {
        self.items.push(Rendered::Menu(entries.to_vec()));
    }

    fn table(&mut self, table: &TableView) {
        self.items.push(Rendered::Table(table.clone()));
    }

    fn chart(&mut self, plan: &ChartPlan) {
        self.items.push(Rendered::Chart(plan.clone()));
    }

    fn info(&mut self, message: &str) {
        self.items.push(Rendered::Info(message.to_string()));
    }

    fn warning(&mut self, message: &str) {
        self.items.push(Rendered::Warning(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.items.push(Rendered::Error(message.to_string()));
    }
}
