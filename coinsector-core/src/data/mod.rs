//! Data acquisition and calendar alignment

pub mod align;
pub mod paginate;
pub mod provider;
pub mod universe;
pub mod upbit;
pub mod yahoo;

pub use align::{align, align_all};
pub use paginate::{fetch_paginated, CandlePager};
pub use provider::{
    DataError, DataProvider, FetchOutcome, FetchProgress, FetchWindow, LogProgress,
    MarketDirectory, NoProgress,
};
pub use universe::{Sector, Universe};
pub use upbit::UpbitProvider;
pub use yahoo::YahooProvider;
