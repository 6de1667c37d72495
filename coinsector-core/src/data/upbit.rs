//! Upbit quotation API provider.
//!
//! Lists markets from `/v1/market/all` and pages daily candles from
//! `/v1/candles/days`. Upbit's `to` parameter is exclusive; the pager contract
//! is inclusive, so requests ask for candles before the day after `through`.

use super::paginate::{fetch_paginated, CandlePager};
use super::provider::{DataError, DataProvider, FetchWindow, MarketDirectory};
use crate::domain::PriceRecord;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;

const BASE_URL: &str = "https://api.upbit.com/v1";

/// Largest page `/v1/candles/days` serves.
pub const MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Deserialize)]
struct MarketInfo {
    market: String,
}

#[derive(Debug, Deserialize)]
struct DayCandle {
    market: String,
    candle_date_time_utc: String,
    trade_price: f64,
}

pub struct UpbitProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    page_size: u32,
}

impl UpbitProvider {
    pub fn new(page_size: u32) -> Result<Self, DataError> {
        Self::with_base_url(BASE_URL, page_size)
    }

    pub fn with_base_url(base_url: impl Into<String>, page_size: u32) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    /// Exclusive `to` timestamp that makes `through` the newest candle served.
    fn to_param(through: NaiveDate) -> String {
        let next_day = through + Duration::days(1);
        next_day.format("%Y-%m-%dT00:00:00Z").to_string()
    }

    /// GET `url` and return the body; `None` on 404.
    fn get_json(
        &self,
        url: &str,
        symbol: &str,
        query: &[(&str, String)],
    ) -> Result<Option<String>, DataError> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                provider: "upbit".into(),
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text()
            .map(Some)
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))
    }

    /// Parse a `/v1/market/all` body, keeping markets quoted in `quote_currency`.
    pub fn parse_markets(body: &str, quote_currency: &str) -> Result<Vec<String>, DataError> {
        let markets: Vec<MarketInfo> = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse market list: {e}"))
        })?;
        let prefix = format!("{quote_currency}-");
        Ok(markets
            .into_iter()
            .map(|m| m.market)
            .filter(|m| m.starts_with(&prefix))
            .collect())
    }

    /// Parse a `/v1/candles/days` body into records dated by the UTC candle open.
    pub fn parse_candles(body: &str) -> Result<Vec<PriceRecord>, DataError> {
        let candles: Vec<DayCandle> = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse candles: {e}"))
        })?;

        candles
            .into_iter()
            .map(|c| {
                let opened =
                    NaiveDateTime::parse_from_str(&c.candle_date_time_utc, "%Y-%m-%dT%H:%M:%S")
                        .map_err(|e| {
                            DataError::ResponseFormatChanged(format!(
                                "invalid candle_date_time_utc '{}': {e}",
                                c.candle_date_time_utc
                            ))
                        })?;
                Ok(PriceRecord::new(c.market, opened.date(), c.trade_price))
            })
            .collect()
    }
}

impl CandlePager for UpbitProvider {
    fn page(
        &self,
        market: &str,
        count: u32,
        through: NaiveDate,
    ) -> Result<Vec<PriceRecord>, DataError> {
        let url = format!("{}/candles/days", self.base_url);
        let query = [
            ("market", market.to_string()),
            ("count", count.to_string()),
            ("to", Self::to_param(through)),
        ];
        match self.get_json(&url, market, &query)? {
            Some(body) => Self::parse_candles(&body),
            None => Ok(Vec::new()),
        }
    }
}

impl MarketDirectory for UpbitProvider {
    fn markets(&self, quote_currency: &str) -> Result<Vec<String>, DataError> {
        let url = format!("{}/market/all", self.base_url);
        let body = self
            .get_json(&url, "market/all", &[])?
            .ok_or_else(|| DataError::ResponseFormatChanged("market list not found".into()))?;
        Self::parse_markets(&body, quote_currency)
    }
}

impl DataProvider for UpbitProvider {
    fn name(&self) -> &str {
        "upbit"
    }

    fn fetch(&self, symbol: &str, window: FetchWindow) -> Result<Vec<PriceRecord>, DataError> {
        fetch_paginated(self, symbol, window, self.page_size)
    }
}
