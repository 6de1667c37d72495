//! Coinsector Core: domain types, data providers, alignment, imputation, statistics.
//!
//! This crate contains the data side of the crypto-vs-sector study:
//! - Domain types (price records, series, reference calendar, matrix)
//! - Upbit and Yahoo Finance providers behind a common `DataProvider` trait
//! - Backward cursor pagination for candle APIs
//! - Calendar alignment and sector averaging
//! - KNN gap imputation with an explicit scarce-neighbour policy
//! - Dataset combination and fingerprinting
//! - Lead join, Pearson correlation and 2-D PCA

pub mod aggregate;
pub mod combine;
pub mod data;
pub mod domain;
pub mod impute;
pub mod stats;

pub use aggregate::sector_mean;
pub use combine::{combine, CombineError, CombinedDataset};
pub use domain::{CalendarError, Matrix, MatrixError, PriceRecord, PriceSeries, ReferenceCalendar};
pub use impute::{ImputeError, KnnImputer, DEFAULT_NEIGHBORS};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed to worker threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<Matrix>();
        require_sync::<Matrix>();
        require_send::<CombinedDataset>();
        require_sync::<CombinedDataset>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::UpbitProvider>();
        require_sync::<data::UpbitProvider>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
    }

    #[test]
    fn providers_are_usable_as_trait_objects() {
        fn _check(p: &dyn data::DataProvider, m: &dyn data::MarketDirectory) -> (String, bool) {
            (p.name().to_string(), m.markets("KRW").is_ok())
        }
    }
}
