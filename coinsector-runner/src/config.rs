//! Serializable pipeline configuration.
//!
//! Every field has a default; an empty TOML file reproduces the standard
//! study: three-year look-back, K = 5, a 3-day lead, KRW-BTC as the
//! reference calendar.

use chrono::NaiveDate;
use coinsector_core::data::upbit::MAX_PAGE_SIZE;
use coinsector_core::data::FetchWindow;
use coinsector_core::{DEFAULT_NEIGHBORS, stats::DEFAULT_LEAD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Parameters of one end-to-end run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Look-back window in days, ending at `as_of`.
    pub lookback_days: i64,

    /// Last date of the window. Today (UTC) when unset.
    pub as_of: Option<NaiveDate>,

    /// Neighbour count for sector gap imputation.
    pub neighbors: usize,

    /// Calendar steps by which the instrument series leads the sector series.
    pub lead: usize,

    /// Instrument whose dates form the reference calendar.
    pub reference_instrument: String,

    /// Quote currency used to discover markets (`KRW` keeps `KRW-*`).
    pub quote_currency: String,

    /// Explicit market list. When unset, markets are discovered.
    pub markets: Option<Vec<String>>,

    /// Candles requested per page.
    pub page_size: u32,

    /// Concurrent fetches. 1 fetches sequentially.
    pub fetch_workers: usize,

    pub output: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 365 * 3,
            as_of: None,
            neighbors: DEFAULT_NEIGHBORS,
            lead: DEFAULT_LEAD,
            reference_instrument: "KRW-BTC".into(),
            quote_currency: "KRW".into(),
            markets: None,
            page_size: MAX_PAGE_SIZE,
            fetch_workers: 1,
            output: OutputConfig::default(),
        }
    }
}

/// Where and how the two artifacts are written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub dataset_file: String,
    pub plot_file: String,
    /// Minimum image width in pixels.
    pub width: u32,
    /// Minimum image height in pixels.
    pub height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            dataset_file: "combined_crypto_sector_data.csv".into(),
            plot_file: "pca_correlation_visualization.png".into(),
            width: 1200,
            height: 800,
        }
    }
}

impl OutputConfig {
    pub fn dataset_path(&self) -> PathBuf {
        self.dir.join(&self.dataset_file)
    }

    pub fn plot_path(&self) -> PathBuf {
        self.dir.join(&self.plot_file)
    }
}

impl PipelineConfig {
    /// The fetch window ending at `as_of`, or at `today` when unset.
    pub fn window(&self, today: NaiveDate) -> FetchWindow {
        FetchWindow::lookback(self.as_of.unwrap_or(today), self.lookback_days)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days <= 0 {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be positive, got {}",
                self.lookback_days
            )));
        }
        if self.neighbors == 0 {
            return Err(ConfigError::Invalid("neighbors must be at least 1".into()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "page_size must be in 1..={MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.fetch_workers == 0 {
            return Err(ConfigError::Invalid("fetch_workers must be at least 1".into()));
        }
        if self.reference_instrument.trim().is_empty() {
            return Err(ConfigError::Invalid("reference_instrument is empty".into()));
        }
        if self.output.dataset_file.trim().is_empty() || self.output.plot_file.trim().is_empty() {
            return Err(ConfigError::Invalid("output file names must not be empty".into()));
        }
        Ok(())
    }
}
