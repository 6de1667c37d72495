//! End-to-end pipeline: fetch, align, impute, combine, export, analyse, plot.
//!
//! Every stage is a standalone function so tests can drive each one with
//! in-memory series. `run_pipeline` strings them together using the
//! configured providers.

use crate::analysis::{analyze_pairs, PairAnalysis};
use crate::collect::Fetcher;
use crate::config::PipelineConfig;
use crate::reporting::{render_pca_grid, write_dataset_csv, GridLayout, PlotError};
use chrono::{NaiveDate, Utc};
use coinsector_core::data::{
    align, align_all, DataError, DataProvider, FetchProgress, FetchWindow, MarketDirectory,
    Universe,
};
use coinsector_core::{
    combine, CalendarError, CombineError, CombinedDataset, ImputeError, KnnImputer, Matrix,
    PriceSeries, ReferenceCalendar,
};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline failures. "No data" conditions never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("reference instrument '{0}' returned no data")]
    MissingReference(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Impute(#[from] ImputeError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("failed to build fetch worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Export(#[from] anyhow::Error),
}

/// The external services a run talks to.
#[derive(Clone, Copy)]
pub struct Providers<'a> {
    /// Lists coin markets when the configuration does not name them.
    pub markets: &'a dyn MarketDirectory,
    pub coins: &'a dyn DataProvider,
    pub equities: &'a dyn DataProvider,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub window: FetchWindow,
    /// Markets requested from the coin provider.
    pub markets_requested: usize,
    pub instruments: Vec<String>,
    pub sectors: Vec<String>,
    pub rows: usize,
    /// BLAKE3 fingerprint of the combined dataset.
    pub dataset_hash: String,
    pub dataset_path: PathBuf,
    pub plot_path: PathBuf,
    pub pairs: Vec<PairAnalysis>,
}

/// Calendar of the reference instrument's dates.
pub fn build_reference_calendar(
    instruments: &[PriceSeries],
    reference: &str,
) -> Result<ReferenceCalendar, PipelineError> {
    let series = instruments
        .iter()
        .find(|s| s.name == reference)
        .ok_or_else(|| PipelineError::MissingReference(reference.to_string()))?;
    Ok(ReferenceCalendar::from_series(series)?)
}

/// Align one sector aggregate onto the calendar and fill its gaps. `None`
/// when no observation falls on a calendar date; the sector is omitted.
pub fn align_and_impute(
    calendar: &ReferenceCalendar,
    sector: &PriceSeries,
    imputer: &KnnImputer,
) -> Result<Option<Matrix>, PipelineError> {
    let aligned = align(calendar, sector);
    let missing = aligned.missing_count();
    if missing == aligned.n_rows() {
        tracing::warn!(
            sector = %sector.name,
            observations = sector.len(),
            "no sector data on the reference calendar, sector omitted"
        );
        return Ok(None);
    }
    let imputed = imputer.impute(&aligned)?;
    if missing > 0 {
        tracing::debug!(sector = %sector.name, imputed = missing, "sector gaps filled");
    }
    Ok(Some(imputed))
}

/// Raw instrument columns plus aligned and imputed sector columns.
pub fn assemble_dataset(
    calendar: &ReferenceCalendar,
    instruments: &[PriceSeries],
    sectors: &[PriceSeries],
    imputer: &KnnImputer,
) -> Result<CombinedDataset, PipelineError> {
    let instrument_matrix = align_all(calendar, instruments);
    let mut sector_matrices = Vec::with_capacity(sectors.len());
    for sector in sectors {
        if let Some(matrix) = align_and_impute(calendar, sector, imputer)? {
            sector_matrices.push(matrix);
        }
    }
    Ok(combine(&instrument_matrix, &sector_matrices)?)
}

/// Run the whole study and write both artifacts.
pub fn run_pipeline(
    config: &PipelineConfig,
    universe: &Universe,
    providers: Providers<'_>,
    progress: &dyn FetchProgress,
) -> Result<PipelineReport, PipelineError> {
    let imputer = KnnImputer::new(config.neighbors)?;
    let window = config.window(today());
    tracing::info!(start = %window.start, end = %window.end, "fetch window");

    let markets = match &config.markets {
        Some(list) => list.clone(),
        None => {
            let found = providers.markets.markets(&config.quote_currency)?;
            tracing::info!(
                quote = %config.quote_currency,
                count = found.len(),
                "markets discovered"
            );
            found
        }
    };

    let coin_fetcher = Fetcher::new(providers.coins, window, config.fetch_workers, progress)?;
    let instruments = coin_fetcher.fetch_all(&markets)?;
    let calendar = build_reference_calendar(&instruments, &config.reference_instrument)?;
    tracing::info!(
        reference = %config.reference_instrument,
        dates = calendar.len(),
        first = %calendar.first(),
        last = %calendar.last(),
        "reference calendar"
    );

    let equity_fetcher = Fetcher::new(providers.equities, window, config.fetch_workers, progress)?;
    let sectors = equity_fetcher.sector_aggregates(universe)?;

    let dataset = assemble_dataset(&calendar, &instruments, &sectors, &imputer)?;
    let dataset_hash = dataset.fingerprint();

    let dataset_path = config.output.dataset_path();
    write_dataset_csv(&dataset_path, &dataset)?;
    tracing::info!(path = %dataset_path.display(), rows = dataset.n_rows(), "dataset saved");

    let pairs = analyze_pairs(&dataset, config.lead);
    let layout = GridLayout::new(
        dataset.instrument_names().len(),
        dataset.sector_names().len(),
        config.output.width,
        config.output.height,
    );
    let plot_path = config.output.plot_path();
    render_pca_grid(&plot_path, &pairs, layout)?;
    tracing::info!(path = %plot_path.display(), pairs = pairs.len(), "plot saved");

    tracing::info!(
        instruments = dataset.instrument_names().len(),
        sectors = dataset.sector_names().len(),
        rows = dataset.n_rows(),
        hash = %dataset_hash,
        "run complete"
    );

    Ok(PipelineReport {
        window,
        markets_requested: markets.len(),
        instruments: dataset.instrument_names().to_vec(),
        sectors: dataset.sector_names().to_vec(),
        rows: dataset.n_rows(),
        dataset_hash,
        dataset_path,
        plot_path,
        pairs,
    })
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
