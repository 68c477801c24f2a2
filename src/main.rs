//! CLI entry point for the CTA ridership reporter.
//!
//! Opens the ridership database read-only, prints summary statistics, and
//! serves the interactive report menu until the user exits.

use anyhow::Result;
use clap::Parser;
use cta_reports::db::Database;
use cta_reports::session::{ChartSettings, Session};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cta_reports")]
#[command(about = "Interactive reports over the CTA L daily ridership database", long_about = None)]
struct Cli {
    /// SQLite database to query
    #[arg(short, long, default_value = "CTA2_L_daily_ridership.db")]
    database: PathBuf,

    /// Directory rendered charts are written to
    #[arg(short, long, default_value = "charts")]
    chart_dir: PathBuf,

    /// Background map for the proximity chart
    #[arg(short, long, default_value = "chicago.png")]
    map_image: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: quiet colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/cta_reports.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cta_reports.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let db = Database::open(&cli.database)?;
    info!(database = %cli.database.display(), "Session started");

    let charts = ChartSettings {
        dir: cli.chart_dir,
        map_image: cli.map_image,
    };
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(&db, stdin.lock(), stdout.lock(), charts).run()?;

    info!("Session finished");
    Ok(())
}
