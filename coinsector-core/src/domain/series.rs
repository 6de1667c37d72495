//! Date-ordered price series.
//!
//! The same type carries a single instrument's closes and a sector's
//! cross-sectional mean; only the name differs.

use super::record::PriceRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Ordered mapping date → price, scoped to one named instrument or sector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub name: String,
    points: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: BTreeMap::new(),
        }
    }

    /// Project raw records onto (date, price).
    ///
    /// Non-finite prices are treated as absent. When two records share a date
    /// the later one in `records` wins.
    pub fn from_records(name: impl Into<String>, records: &[PriceRecord]) -> Self {
        let mut series = Self::new(name);
        for record in records {
            series.insert(record.date, record.price);
        }
        series
    }

    pub fn from_points(
        name: impl Into<String>,
        points: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        let mut series = Self::new(name);
        for (date, price) in points {
            series.insert(date, price);
        }
        series
    }

    /// Insert a point, replacing any existing value for `date`. Non-finite
    /// prices are ignored.
    pub fn insert(&mut self, date: NaiveDate, price: f64) {
        if price.is_finite() {
            self.points.insert(date, price);
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.keys().copied()
    }

    /// (date, price) pairs in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().map(|(d, p)| (*d, *p))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn from_records_orders_by_date() {
        let records = vec![
            PriceRecord::new("KRW-BTC", d("2024-01-03"), 3.0),
            PriceRecord::new("KRW-BTC", d("2024-01-01"), 1.0),
            PriceRecord::new("KRW-BTC", d("2024-01-02"), 2.0),
        ];
        let series = PriceSeries::from_records("KRW-BTC", &records);
        let dates: Vec<_> = series.dates().collect();
        assert_eq!(dates, vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-03")]);
        assert_eq!(series.first_date(), Some(d("2024-01-01")));
        assert_eq!(series.last_date(), Some(d("2024-01-03")));
    }

    #[test]
    fn duplicate_date_last_write_wins() {
        let records = vec![
            PriceRecord::new("AAPL", d("2024-01-02"), 100.0),
            PriceRecord::new("AAPL", d("2024-01-02"), 101.5),
        ];
        let series = PriceSeries::from_records("AAPL", &records);
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(d("2024-01-02")), Some(101.5));
    }

    #[test]
    fn non_finite_prices_are_dropped() {
        let mut series = PriceSeries::new("AAPL");
        series.insert(d("2024-01-02"), f64::NAN);
        series.insert(d("2024-01-03"), f64::INFINITY);
        assert!(series.is_empty());
    }
}
