//! Coinsector Runner: pipeline orchestration, pair analysis, reporting.
//!
//! This crate builds on `coinsector-core` to provide:
//! - TOML pipeline configuration with defaults for the standard study
//! - Multi-symbol fetching, sequential or on a worker pool, with progress
//! - The end-to-end pipeline and its independently callable stages
//! - Lead correlation and PCA per (instrument, sector) pair
//! - Dataset CSV export and the PCA scatter grid
//! - `tracing` subscriber setup

pub mod analysis;
pub mod collect;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod reporting;

pub use analysis::{analyze_pair, analyze_pairs, PairAnalysis};
pub use collect::Fetcher;
pub use config::{ConfigError, OutputConfig, PipelineConfig};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use pipeline::{
    align_and_impute, assemble_dataset, build_reference_calendar, run_pipeline, PipelineError,
    PipelineReport, Providers,
};
pub use reporting::{render_pca_grid, write_dataset_csv, GridLayout, PlotError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<PipelineConfig>();
        assert_sync::<PipelineConfig>();
        assert_send::<LogConfig>();
        assert_sync::<LogConfig>();
    }

    #[test]
    fn result_types_are_send_sync() {
        assert_send::<PairAnalysis>();
        assert_sync::<PairAnalysis>();
        assert_send::<PipelineReport>();
        assert_sync::<PipelineReport>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<PipelineError>();
        assert_sync::<PipelineError>();
        assert_send::<PlotError>();
        assert_sync::<PlotError>();
    }

    #[test]
    fn fetcher_is_sync() {
        assert_sync::<Fetcher<'static>>();
    }
}
