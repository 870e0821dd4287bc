//! DayLab CLI — observation window and weekday breakdown for a daily index series.
//!
//! Commands:
//! - `scan` — fetch the window from Yahoo Finance (or a CSV export), print the
//!   annotated table and the weekday counts
//! - `window` — print the observation window only

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use daylab_core::data::{CsvProvider, DataProvider, YahooProvider};
use daylab_core::frame::{annotated_to_frame, counts_to_frame};
use daylab_core::{run_scan, LabelStyle, ScanConfig, ScanOverrides, ScanReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "daylab",
    about = "DayLab CLI — which weekdays does an index actually trade on?"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily data over the window and report the weekday breakdown.
    Scan {
        #[command(flatten)]
        opts: ScanOpts,

        /// Read observations from a CSV export instead of Yahoo Finance.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Label style for the weekday column: name or ordinal.
        #[arg(long)]
        label: Option<LabelStyle>,

        /// Number of annotated rows to print.
        #[arg(long, default_value_t = 5)]
        rows: usize,

        /// Print the full report as JSON instead of tables.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the observation window without fetching anything.
    Window {
        #[command(flatten)]
        opts: ScanOpts,
    },
}

/// Options shared by every command.
#[derive(Args)]
struct ScanOpts {
    /// TOML config file with a [scan] table. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker symbol. Defaults to ^NSEI.
    #[arg(long)]
    symbol: Option<String>,

    /// Window length in years. Defaults to 2.
    #[arg(long)]
    years: Option<u32>,

    /// Reference date (YYYY-MM-DD) the window ends at. Defaults to today.
    #[arg(long)]
    as_of: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            opts,
            csv,
            label,
            rows,
            json,
        } => {
            let config = load_config(&opts, label, csv)?;
            run_scan_cmd(&config, rows, json)
        }
        Commands::Window { opts } => {
            let config = load_config(&opts, None, None)?;
            let window = config.window();
            println!("{}", window.end);
            println!("{}", window.start);
            Ok(())
        }
    }
}

/// Config file (or defaults) with the command-line flags applied on top.
fn load_config(
    opts: &ScanOpts,
    label: Option<LabelStyle>,
    csv: Option<PathBuf>,
) -> Result<ScanConfig> {
    let as_of = opts
        .as_of
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid --as-of date '{raw}'"))
        })
        .transpose()?;

    let overrides = ScanOverrides {
        symbol: opts.symbol.clone(),
        years: opts.years,
        as_of,
        label,
        csv,
    };
    Ok(ScanConfig::resolve(opts.config.as_deref(), overrides)?)
}

fn run_scan_cmd(config: &ScanConfig, rows: usize, json: bool) -> Result<()> {
    let provider: Box<dyn DataProvider> = match &config.scan.csv {
        Some(path) => Box::new(CsvProvider::new(path)),
        None => Box::new(YahooProvider::new()?),
    };

    let window = config.window();
    let report = run_scan(
        provider.as_ref(),
        &config.scan.symbol,
        window,
        &config.annotator(),
    )
    .with_context(|| format!("fetching {} from {}", config.scan.symbol, provider.name()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, rows)?;
    }

    Ok(())
}

fn print_report(report: &ScanReport, rows: usize) -> Result<()> {
    let table = &report.annotation.table;
    let counts = &report.annotation.counts;

    println!();
    println!("=== {} ===", report.symbol);
    println!("Window:         {}", report.window);
    println!("Source:         {:?}", report.source);
    println!("Observations:   {}", table.len());
    println!();

    if table.is_empty() {
        println!("No observations in window.");
        return Ok(());
    }

    let frame = annotated_to_frame(table)?;
    println!("{}", frame.head(Some(rows)));
    println!();

    println!("--- Day of Week ---");
    println!("{}", counts_to_frame(counts)?);
    println!();

    Ok(())
}
