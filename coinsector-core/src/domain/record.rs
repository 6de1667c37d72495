//! Raw provider records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily price observation for one instrument, as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub instrument: String,
    pub date: NaiveDate,
    pub price: f64,
}

impl PriceRecord {
    pub fn new(instrument: impl Into<String>, date: NaiveDate, price: f64) -> Self {
        Self {
            instrument: instrument.into(),
            date,
            price,
        }
    }
}
