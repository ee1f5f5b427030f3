//! FILENAME: app/src/main.rs
// PURPOSE: Terminal entry point for the dashboard.

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use dashboard_lib::{
    dispatch, init_log_file, log_error, log_info, step, AppContext, Command, DashboardConfig, FilterSelection,
    Presenter, TerminalPresenter, View,
};
use pivot_engine::{AggregationType, ChartKind};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Technician performance dashboard over sheet data")]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page to open first (landing, ioan, ioan-sla, psb-pivot, ...)
    #[arg(long, default_value = "landing")]
    page: View,

    /// Directory holding the .xlsx workbooks (overrides the config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Pivot row fields, comma separated
    #[arg(long, value_delimiter = ',')]
    rows: Option<Vec<String>>,

    /// Pivot column fields, comma separated
    #[arg(long, value_delimiter = ',')]
    cols: Vec<String>,

    /// Pivot value field
    #[arg(long)]
    values: Option<String>,

    /// Aggregation: count, sum, mean, min or max
    #[arg(long, default_value = "count")]
    agg: AggregationType,

    /// Chart type: bar, line or pie
    #[arg(long, default_value = "bar")]
    chart: ChartKind,

    /// Column to filter the pivot source on
    #[arg(long)]
    filter_column: Option<String>,

    /// Accepted values for --filter-column (repeatable)
    #[arg(long)]
    filter_value: Vec<String>,

    /// Read navigation commands from stdin (open <page>, back, home, quit)
    #[arg(long)]
    interactive: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match DashboardConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        },
        None => DashboardConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    if let Some(path) = config.log_file.clone() {
        if let Err(e) = init_log_file(&path) {
            eprintln!("[LOG_INIT] {}", e);
        }
    }
    log_info!("APP", "data_dir={:?} cache_ttl={}s", config.data_dir, config.cache_ttl_secs);

    let mut ctx = AppContext::new(config);
    ctx.pivot.rows = cli.rows;
    ctx.pivot.columns = cli.cols;
    ctx.pivot.values = cli.values;
    ctx.pivot.aggregation = cli.agg;
    ctx.pivot.chart = cli.chart;
    ctx.pivot.filter = cli.filter_column.map(|column| FilterSelection {
        column,
        values: cli.filter_value,
    });

    let mut presenter = TerminalPresenter::new(io::stdout());
    dispatch(cli.page, &ctx, &mut presenter);

    if cli.interactive {
        run_interactive(cli.page, &ctx, &mut presenter);
    }
}

fn run_interactive(start: View, ctx: &AppContext, presenter: &mut dyn Presenter) {
    let mut view = start;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log_error!("APP", "stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Navigate(action)) => view = step(view, action, ctx, presenter),
            Err(e) => eprintln!("{}", e),
        }
    }
}
