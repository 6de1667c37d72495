//! Lead shift and inner join of two calendar-aligned columns.

use chrono::NaiveDate;

/// Lead, in calendar steps, used by the pipeline.
pub const DEFAULT_LEAD: usize = 3;

/// Paired observations surviving the shift and the drop of missing rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedPairs {
    pub dates: Vec<NaiveDate>,
    /// Instrument value `lead` steps after `dates[i]`.
    pub leading: Vec<f64>,
    /// Sector value on `dates[i]`.
    pub sector: Vec<f64>,
}

impl JoinedPairs {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.leading
            .iter()
            .copied()
            .zip(self.sector.iter().copied())
            .collect()
    }
}

/// Shift `instrument` back by `lead` steps and join it with `sector` on date.
///
/// Both columns are indexed by `dates`. Position `i` pairs `sector[i]` with
/// `instrument[i + lead]`; the last `lead` positions have no instrument value.
/// Rows where either side is missing are dropped.
pub fn lead_join(
    dates: &[NaiveDate],
    instrument: &[Option<f64>],
    sector: &[Option<f64>],
    lead: usize,
) -> JoinedPairs {
    let mut joined = JoinedPairs::default();
    for (i, date) in dates.iter().enumerate() {
        let shifted = instrument.get(i + lead).copied().flatten();
        let sector_value = sector.get(i).copied().flatten();
        if let (Some(x), Some(y)) = (shifted, sector_value) {
            joined.dates.push(*date);
            joined.leading.push(x);
            joined.sector.push(y);
        }
    }
    joined
}
