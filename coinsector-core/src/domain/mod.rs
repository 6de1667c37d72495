//! Domain types: price records, per-instrument series, the reference calendar,
//! and the date-indexed matrix every pipeline stage passes around.

pub mod calendar;
pub mod matrix;
pub mod record;
pub mod series;

pub use calendar::{CalendarError, ReferenceCalendar};
pub use matrix::{Matrix, MatrixError};
pub use record::PriceRecord;
pub use series::PriceSeries;
