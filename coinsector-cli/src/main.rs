//! Coinsector CLI: crypto vs equity-sector lead correlation study.
//!
//! With no arguments the standard study runs: every KRW market on Upbit,
//! the default 11-sector equity universe from Yahoo Finance, a three-year
//! window, K = 5 imputation and a 3-day lead. Writes the combined dataset CSV
//! and the PCA scatter grid PNG into the output directory.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use coinsector_core::data::{LogProgress, Universe, UpbitProvider, YahooProvider};
use coinsector_runner::{
    init_logging, run_pipeline, LogConfig, LogFormat, PipelineConfig, PipelineReport, Providers,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "coinsector",
    version,
    about = "Coinsector: lead correlation and PCA of crypto markets vs equity sectors"
)]
struct Cli {
    /// Pipeline configuration (TOML). Defaults reproduce the standard study.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sector universe (TOML, `[[sectors]]` with `name` and `tickers`).
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Directory for the CSV and PNG outputs.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Reference instrument whose dates form the calendar (e.g. KRW-BTC).
    #[arg(long)]
    reference: Option<String>,

    /// Last date of the look-back window (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Concurrent fetches. 1 fetches sequentially.
    #[arg(long)]
    workers: Option<usize>,

    /// Log filter directive; RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format: pretty, compact or json.
    #[arg(long, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Print the built-in sector universe as TOML and exit.
    #[arg(long, default_value_t = false)]
    print_universe: bool,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(reference) = &self.reference {
            config.reference_instrument = reference.clone();
        }
        if let Some(as_of) = self.as_of {
            config.as_of = Some(as_of);
        }
        if let Some(workers) = self.workers {
            config.fetch_workers = workers;
        }
        config.validate()?;
        Ok(config)
    }

    fn universe(&self) -> Result<Universe> {
        match &self.universe {
            Some(path) => Universe::from_file(path).map_err(anyhow::Error::msg),
            None => Ok(Universe::default_sectors()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_universe {
        let toml = Universe::default_sectors()
            .to_toml()
            .map_err(anyhow::Error::msg)?;
        print!("{toml}");
        return Ok(());
    }

    init_logging(&LogConfig::new(&cli.log_level).with_format(cli.log_format))?;

    let config = cli.pipeline_config()?;
    let universe = cli.universe()?;
    tracing::info!(
        sectors = universe.sectors.len(),
        tickers = universe.ticker_count(),
        "sector universe loaded"
    );

    let upbit = UpbitProvider::new(config.page_size)?;
    let yahoo = YahooProvider::new()?;
    let providers = Providers {
        markets: &upbit,
        coins: &upbit,
        equities: &yahoo,
    };

    let report = run_pipeline(&config, &universe, providers, &LogProgress)?;
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    println!();
    println!("=== Coinsector Run ===");
    println!("Window:       {} to {}", report.window.start, report.window.end);
    println!(
        "Instruments:  {} of {} markets had data",
        report.instruments.len(),
        report.markets_requested
    );
    println!("Sectors:      {}", report.sectors.join(", "));
    println!("Rows:         {}", report.rows);
    println!("Pairs:        {} analysed", report.pairs.len());
    println!("Dataset hash: {}", report.dataset_hash);
    println!();
    println!("Dataset saved to: {}", report.dataset_path.display());
    println!("Plot saved to:    {}", report.plot_path.display());
}
