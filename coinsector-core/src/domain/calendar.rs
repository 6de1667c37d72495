//! The reference calendar every aligned matrix is indexed by.

use super::series::PriceSeries;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CalendarError {
    #[error("reference calendar is empty")]
    Empty,

    #[error("reference instrument '{0}' has no records")]
    EmptyReference(String),
}

/// Ascending, de-duplicated, non-empty sequence of dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCalendar {
    dates: Vec<NaiveDate>,
}

impl ReferenceCalendar {
    pub fn new(mut dates: Vec<NaiveDate>) -> Result<Self, CalendarError> {
        dates.sort_unstable();
        dates.dedup();
        if dates.is_empty() {
            return Err(CalendarError::Empty);
        }
        Ok(Self { dates })
    }

    /// Take the dates of one canonical instrument's series.
    pub fn from_series(series: &PriceSeries) -> Result<Self, CalendarError> {
        if series.is_empty() {
            return Err(CalendarError::EmptyReference(series.name.clone()));
        }
        Ok(Self {
            dates: series.dates().collect(),
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }
}
