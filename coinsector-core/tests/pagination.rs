//! Backward pagination against a scripted candle API.

use chrono::NaiveDate;
use coinsector_core::data::{fetch_paginated, CandlePager, DataError, FetchWindow};
use coinsector_core::PriceRecord;
use std::sync::Mutex;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Replays canned pages in order and records every cursor it was asked for.
struct ScriptedPager {
    pages: Mutex<Vec<Result<Vec<PriceRecord>, DataError>>>,
    cursors: Mutex<Vec<NaiveDate>>,
}

impl ScriptedPager {
    fn new(pages: Vec<Result<Vec<PriceRecord>, DataError>>) -> Self {
        let mut pages = pages;
        pages.reverse();
        Self {
            pages: Mutex::new(pages),
            cursors: Mutex::new(Vec::new()),
        }
    }

    fn cursors(&self) -> Vec<NaiveDate> {
        self.cursors.lock().unwrap().clone()
    }
}

impl CandlePager for ScriptedPager {
    fn page(
        &self,
        _market: &str,
        _count: u32,
        through: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DataError> {
        self.cursors.lock().unwrap().push(through);
        self.pages.lock().unwrap().pop().unwrap_or(Ok(Vec::new()))
    }
}

fn days(market: &str, from: NaiveDate, to: NaiveDate) -> Vec<PriceRecord> {
    let mut out = Vec::new();
    let mut day = to;
    while day >= from {
        out.push(PriceRecord::new(market, day, 1.0));
        day = day.pred_opt().unwrap();
    }
    out
}

#[test]
fn cursor_steps_one_day_before_oldest_record() {
    let pager = ScriptedPager::new(vec![
        Ok(days("KRW-BTC", d(2024, 3, 8), d(2024, 3, 10))),
        Ok(days("KRW-BTC", d(2024, 3, 5), d(2024, 3, 7))),
        Ok(days("KRW-BTC", d(2024, 3, 2), d(2024, 3, 4))),
    ]);
    let window = FetchWindow::new(d(2024, 3, 1), d(2024, 3, 10));

    let records = fetch_paginated(&pager, "KRW-BTC", window, 3).unwrap();

    assert_eq!(
        pager.cursors(),
        vec![d(2024, 3, 10), d(2024, 3, 7), d(2024, 3, 4), d(2024, 3, 1)]
    );
    assert_eq!(records.len(), 9);
}

#[test]
fn empty_page_keeps_accumulated_records() {
    let pager = ScriptedPager::new(vec![
        Ok(days("KRW-XRP", d(2024, 3, 8), d(2024, 3, 10))),
        Ok(Vec::new()),
    ]);
    let window = FetchWindow::new(d(2024, 1, 1), d(2024, 3, 10));

    let records = fetch_paginated(&pager, "KRW-XRP", window, 3).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(pager.cursors().len(), 2);
}

#[test]
fn first_page_empty_means_no_data() {
    let pager = ScriptedPager::new(vec![Ok(Vec::new())]);
    let window = FetchWindow::new(d(2024, 1, 1), d(2024, 3, 10));

    let records = fetch_paginated(&pager, "KRW-NEW", window, 200).unwrap();

    assert!(records.is_empty());
}

#[test]
fn records_before_window_start_are_trimmed() {
    let pager = ScriptedPager::new(vec![Ok(days("KRW-BTC", d(2024, 2, 20), d(2024, 3, 10)))]);
    let window = FetchWindow::new(d(2024, 3, 1), d(2024, 3, 10));

    let records = fetch_paginated(&pager, "KRW-BTC", window, 200).unwrap();

    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|r| r.date >= d(2024, 3, 1)));
    // one page reached past the start, so no second request
    assert_eq!(pager.cursors().len(), 1);
}

#[test]
fn provider_error_is_fatal() {
    let pager = ScriptedPager::new(vec![
        Ok(days("KRW-BTC", d(2024, 3, 8), d(2024, 3, 10))),
        Err(DataError::ResponseFormatChanged("html instead of json".into())),
    ]);
    let window = FetchWindow::new(d(2024, 1, 1), d(2024, 3, 10));

    let err = fetch_paginated(&pager, "KRW-BTC", window, 3).unwrap_err();

    assert!(matches!(err, DataError::ResponseFormatChanged(_)));
}

#[test]
fn non_decreasing_cursor_terminates() {
    // A provider ignoring the cursor keeps returning the same page.
    let same = days("KRW-BTC", d(2024, 3, 8), d(2024, 3, 10));
    let pager = ScriptedPager::new(vec![Ok(same.clone()), Ok(same.clone()), Ok(same)]);
    let window = FetchWindow::new(d(2024, 1, 1), d(2024, 3, 10));

    let records = fetch_paginated(&pager, "KRW-BTC", window, 3).unwrap();

    // second page's oldest is 03-08 again, cursor would not move past 03-07
    assert_eq!(pager.cursors(), vec![d(2024, 3, 10), d(2024, 3, 7)]);
    assert_eq!(records.len(), 6);
}
