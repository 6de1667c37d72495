//! Backward pagination over a cursor-based candle API.
//!
//! The provider hands out at most `page_size` records at or before a cursor
//! date. We walk the cursor back from the window end until it passes the
//! window start or a page comes back empty.

use super::provider::{DataError, FetchWindow};
use crate::domain::PriceRecord;

/// One page of a cursor-based API.
pub trait CandlePager: Send + Sync {
    /// Up to `count` daily records for `market` dated on or before `through`,
    /// newest first. An empty vector means there is no older data.
    fn page(
        &self,
        market: &str,
        count: u32,
        through: chrono::NaiveDate,
    ) -> Result<Vec<PriceRecord>, DataError>;
}

/// Collect every record for `market` inside `window`.
///
/// Records already gathered are kept when a later page is empty. Records
/// outside the window are trimmed from the result.
pub fn fetch_paginated(
    pager: &dyn CandlePager,
    market: &str,
    window: FetchWindow,
    page_size: u32,
) -> Result<Vec<PriceRecord>, DataError> {
    let mut records = Vec::new();
    let mut cursor = window.end;

    while cursor >= window.start {
        let page = pager.page(market, page_size, cursor)?;
        let Some(oldest) = page.iter().map(|r| r.date).min() else {
            tracing::debug!(market, %cursor, "no further data");
            break;
        };
        records.extend(page);

        // The cursor must strictly decrease or a misbehaving provider would
        // keep us here forever.
        match oldest.pred_opt() {
            Some(next) if next < cursor => cursor = next,
            _ => break,
        }
    }

    records.retain(|r| window.contains(r.date));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Serves one candle per day from `first` to `last`, newest first.
    struct DailyPager {
        first: NaiveDate,
        last: NaiveDate,
    }

    impl CandlePager for DailyPager {
        fn page(
            &self,
            market: &str,
            count: u32,
            through: NaiveDate,
        ) -> Result<Vec<PriceRecord>, DataError> {
            let mut out = Vec::new();
            let mut day = through.min(self.last);
            while day >= self.first && out.len() < count as usize {
                out.push(PriceRecord::new(market, day, 1.0));
                day = day.pred_opt().unwrap();
            }
            Ok(out)
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn covers_window_without_gaps() {
        let pager = DailyPager {
            first: d(2020, 1, 1),
            last: d(2024, 12, 31),
        };
        let window = FetchWindow::new(d(2024, 1, 1), d(2024, 12, 31));
        let records = fetch_paginated(&pager, "KRW-BTC", window, 7).unwrap();
        assert_eq!(records.len(), 366);
        assert!(records.iter().all(|r| window.contains(r.date)));
    }

    #[test]
    fn stops_when_history_runs_out() {
        let pager = DailyPager {
            first: d(2024, 12, 20),
            last: d(2024, 12, 31),
        };
        let window = FetchWindow::new(d(2024, 1, 1), d(2024, 12, 31));
        let records = fetch_paginated(&pager, "KRW-NEW", window, 5).unwrap();
        assert_eq!(records.len(), 12);
    }
}
