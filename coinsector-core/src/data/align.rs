//! Calendar alignment.
//!
//! Reindex series onto a reference calendar. Dates the series lacks become
//! missing cells; dates the calendar lacks are dropped. No forward-fill.

use crate::domain::{Matrix, PriceSeries, ReferenceCalendar};

/// Reindex one series onto `reference` as a one-column matrix named after the series.
pub fn align(reference: &ReferenceCalendar, series: &PriceSeries) -> Matrix {
    let mut matrix = Matrix::new(reference.dates().to_vec());
    // Cannot fail: the column is built from the matrix's own index.
    let _ = matrix.push_column(series.name.clone(), aligned_cells(reference, series));
    matrix
}

/// Reindex several series onto `reference`, one column each, in input order.
///
/// Series sharing a name keep only the first occurrence.
pub fn align_all(reference: &ReferenceCalendar, series: &[PriceSeries]) -> Matrix {
    let mut matrix = Matrix::new(reference.dates().to_vec());
    for s in series {
        if matrix
            .push_column(s.name.clone(), aligned_cells(reference, s))
            .is_err()
        {
            tracing::warn!(series = %s.name, "duplicate series name, keeping the first");
        }
    }
    matrix
}

fn aligned_cells(reference: &ReferenceCalendar, series: &PriceSeries) -> Vec<Option<f64>> {
    reference.dates().iter().map(|d| series.get(*d)).collect()
}
