//! Sector aggregation: per-date cross-sectional mean over member series.

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Mean of the members present on each date.
///
/// A date appears in the result when at least one member has a value there.
/// Returns `None` when no member has any data, so the sector can be omitted.
pub fn sector_mean(sector: &str, members: &[PriceSeries]) -> Option<PriceSeries> {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for member in members {
        for (date, price) in member.iter() {
            let entry = sums.entry(date).or_insert((0.0, 0));
            entry.0 += price;
            entry.1 += 1;
        }
    }

    if sums.is_empty() {
        return None;
    }

    Some(PriceSeries::from_points(
        sector,
        sums.into_iter()
            .map(|(date, (sum, count))| (date, sum / count as f64)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn mean_over_available_members() {
        let a = PriceSeries::from_points("A", [(d(1), 10.0), (d(2), 20.0), (d(3), 30.0)]);
        let b = PriceSeries::from_points("B", [(d(1), 20.0), (d(3), 50.0)]);
        let c = PriceSeries::from_points("C", [(d(1), 30.0), (d(4), 7.0)]);

        let mean = sector_mean("Energy", &[a, b, c]).unwrap();

        assert_eq!(mean.name, "Energy");
        assert_eq!(mean.get(d(1)), Some(20.0));
        assert_eq!(mean.get(d(2)), Some(20.0));
        assert_eq!(mean.get(d(3)), Some(40.0));
        assert_eq!(mean.get(d(4)), Some(7.0));
        assert_eq!(mean.get(d(5)), None);
    }

    #[test]
    fn empty_members_contribute_nothing() {
        let a = PriceSeries::from_points("A", [(d(1), 10.0)]);
        let empty = PriceSeries::new("DELISTED");
        let mean = sector_mean("Tech", &[a, empty]).unwrap();
        assert_eq!(mean.get(d(1)), Some(10.0));
    }

    #[test]
    fn sector_without_data_is_omitted() {
        assert!(sector_mean("Tech", &[]).is_none());
        assert!(sector_mean("Tech", &[PriceSeries::new("X")]).is_none());
    }
}
