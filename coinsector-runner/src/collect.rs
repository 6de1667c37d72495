//! Multi-symbol fetch orchestration.
//!
//! Symbols are fetched either sequentially or on a dedicated rayon pool.
//! Either way the returned series follow the input order, so column order in
//! the combined dataset never depends on completion order. Symbols without
//! data are dropped here with a notice; the first hard provider error aborts
//! the batch.

use coinsector_core::data::{
    DataError, DataProvider, FetchOutcome, FetchProgress, FetchWindow, Universe,
};
use coinsector_core::{sector_mean, PriceSeries};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Fetches price series for many symbols from one provider.
pub struct Fetcher<'a> {
    provider: &'a dyn DataProvider,
    window: FetchWindow,
    progress: &'a dyn FetchProgress,
    pool: Option<ThreadPool>,
}

impl<'a> Fetcher<'a> {
    /// `workers <= 1` fetches on the calling thread.
    pub fn new(
        provider: &'a dyn DataProvider,
        window: FetchWindow,
        workers: usize,
        progress: &'a dyn FetchProgress,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = if workers > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("fetch-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self {
            provider,
            window,
            progress,
            pool,
        })
    }

    pub fn window(&self) -> FetchWindow {
        self.window
    }

    /// Fetch every symbol; returns the non-empty series in input order.
    pub fn fetch_all(&self, symbols: &[String]) -> Result<Vec<PriceSeries>, DataError> {
        let total = symbols.len();
        let fetch = |(index, symbol): (usize, &String)| self.fetch_one(symbol, index, total);

        let results: Vec<Result<PriceSeries, DataError>> = match &self.pool {
            Some(pool) => pool.install(|| symbols.par_iter().enumerate().map(fetch).collect()),
            None => symbols.iter().enumerate().map(fetch).collect(),
        };

        let mut series = Vec::with_capacity(total);
        for result in results {
            let s = result?;
            if !s.is_empty() {
                series.push(s);
            }
        }

        self.progress
            .on_batch_complete(series.len(), total - series.len(), total);
        Ok(series)
    }

    /// One mean series per sector, in universe order. Sectors where no
    /// member returned data are omitted.
    pub fn sector_aggregates(&self, universe: &Universe) -> Result<Vec<PriceSeries>, DataError> {
        let mut aggregates = Vec::with_capacity(universe.sectors.len());
        for sector in &universe.sectors {
            tracing::info!(sector = %sector.name, members = sector.tickers.len(), "aggregating sector");
            let members = self.fetch_all(&sector.tickers)?;
            match sector_mean(&sector.name, &members) {
                Some(mean) => {
                    tracing::debug!(
                        sector = %sector.name,
                        contributing = members.len(),
                        dates = mean.len(),
                        "sector mean computed"
                    );
                    aggregates.push(mean);
                }
                None => tracing::warn!(sector = %sector.name, "no member has data, sector omitted"),
            }
        }
        Ok(aggregates)
    }

    fn fetch_one(&self, symbol: &str, index: usize, total: usize) -> Result<PriceSeries, DataError> {
        self.progress.on_start(symbol, index, total);
        let records = self.provider.fetch(symbol, self.window)?;
        let series = PriceSeries::from_records(symbol, &records);
        let outcome = if series.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Records(series.len())
        };
        self.progress.on_complete(symbol, index, total, outcome);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use coinsector_core::data::{NoProgress, Sector};
    use coinsector_core::PriceRecord;
    use std::sync::Mutex;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn window() -> FetchWindow {
        FetchWindow::new(d(1), d(30))
    }

    /// Returns `day` records for symbols named `S{day}`; `EMPTY` has none.
    struct CountingProvider;

    impl DataProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(&self, symbol: &str, _window: FetchWindow) -> Result<Vec<PriceRecord>, DataError> {
            if symbol == "BROKEN" {
                return Err(DataError::ResponseFormatChanged("boom".into()));
            }
            let n: u32 = symbol.trim_start_matches('S').parse().unwrap_or(0);
            Ok((1..=n).map(|day| PriceRecord::new(symbol, d(day), day as f64)).collect())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        batches: Mutex<Vec<(usize, usize, usize)>>,
        empties: Mutex<Vec<String>>,
    }

    impl FetchProgress for RecordingProgress {
        fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

        fn on_complete(&self, symbol: &str, _index: usize, _total: usize, outcome: FetchOutcome) {
            if outcome == FetchOutcome::Empty {
                self.empties.lock().unwrap().push(symbol.to_string());
            }
        }

        fn on_batch_complete(&self, fetched: usize, empty: usize, total: usize) {
            self.batches.lock().unwrap().push((fetched, empty, total));
        }
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_symbols_are_skipped_with_notice() {
        let progress = RecordingProgress::default();
        let fetcher = Fetcher::new(&CountingProvider, window(), 1, &progress).unwrap();

        let series = fetcher.fetch_all(&symbols(&["S3", "EMPTY", "S5"])).unwrap();

        let names: Vec<_> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["S3", "S5"]);
        assert_eq!(*progress.empties.lock().unwrap(), vec!["EMPTY".to_string()]);
        assert_eq!(*progress.batches.lock().unwrap(), vec![(2, 1, 3)]);
    }

    #[test]
    fn pooled_fetch_keeps_input_order() {
        let names: Vec<String> = (1..=20).rev().map(|i| format!("S{i}")).collect();
        let fetcher = Fetcher::new(&CountingProvider, window(), 4, &NoProgress).unwrap();

        let series = fetcher.fetch_all(&names).unwrap();

        let got: Vec<_> = series.iter().map(|s| s.name.clone()).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn hard_error_aborts_batch() {
        let fetcher = Fetcher::new(&CountingProvider, window(), 2, &NoProgress).unwrap();
        let err = fetcher
            .fetch_all(&symbols(&["S1", "BROKEN", "S2"]))
            .unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn sectors_without_data_are_omitted() {
        let universe = Universe::new(vec![
            Sector::new("Full", &["S2", "S4"]),
            Sector::new("Hollow", &["EMPTY", "NOPE"]),
            Sector::new("Half", &["S3", "EMPTY"]),
        ])
        .unwrap();
        let fetcher = Fetcher::new(&CountingProvider, window(), 1, &NoProgress).unwrap();

        let aggregates = fetcher.sector_aggregates(&universe).unwrap();

        let names: Vec<_> = aggregates.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Full", "Half"]);
        // day 1 and 2: mean of both members; days 3 and 4: only S4
        assert_eq!(aggregates[0].get(d(1)), Some(1.0));
        assert_eq!(aggregates[0].get(d(4)), Some(4.0));
        assert_eq!(aggregates[1].len(), 3);
    }
}
