//! Data provider traits and structured error types.
//!
//! `DataProvider` abstracts over the coin-candle API and the equity
//! price-history API so the pipeline can run against in-memory fakes in tests.

use crate::domain::PriceRecord;
use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Structured error types for provider operations.
///
/// "No data" is never an error: providers return an empty record list and the
/// caller decides to skip the instrument.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {provider} for '{symbol}'")]
    HttpStatus {
        provider: String,
        symbol: String,
        status: u16,
    },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("http client: {0}")]
    Client(String),
}

/// Inclusive date window a fetch must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days`-long window ending at `end`.
    pub fn lookback(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A source of daily price records for named instruments.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily records for `symbol` inside `window`. An unknown symbol or
    /// a symbol without history yields `Ok(vec![])`.
    fn fetch(&self, symbol: &str, window: FetchWindow) -> Result<Vec<PriceRecord>, DataError>;
}

/// A provider that can list the markets it quotes.
pub trait MarketDirectory: Send + Sync {
    /// Market identifiers quoted in `quote_currency`, in the provider's listing order.
    fn markets(&self, quote_currency: &str) -> Result<Vec<String>, DataError>;
}

/// Outcome of fetching one instrument, as reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Records(usize),
    Empty,
}

/// Progress callback for multi-symbol fetches.
///
/// Callbacks may arrive from worker threads and out of index order.
pub trait FetchProgress: Send + Sync {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol fetch completes without a hard error.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, outcome: FetchOutcome);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, fetched: usize, empty: usize, total: usize);
}

/// Progress reporter that emits `tracing` events.
pub struct LogProgress;

impl FetchProgress for LogProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        tracing::info!(symbol, "[{}/{}] fetching", index + 1, total);
    }

    fn on_complete(&self, symbol: &str, _index: usize, _total: usize, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Records(n) => tracing::debug!(symbol, records = n, "fetched"),
            FetchOutcome::Empty => tracing::warn!(symbol, "no data, skipping"),
        }
    }

    fn on_batch_complete(&self, fetched: usize, empty: usize, total: usize) {
        tracing::info!(fetched, empty, total, "fetch batch complete");
    }
}

/// Progress reporter that discards every callback.
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}
    fn on_complete(&self, _symbol: &str, _index: usize, _total: usize, _outcome: FetchOutcome) {}
    fn on_batch_complete(&self, _fetched: usize, _empty: usize, _total: usize) {}
}
