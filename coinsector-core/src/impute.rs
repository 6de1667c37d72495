//! K-nearest-neighbour gap filling.
//!
//! Every missing cell becomes the uniform mean of the same column in the K
//! donor rows closest to the receiver row. Distances use the NaN-aware
//! Euclidean metric: only coordinates observed in both rows count, and the
//! squared sum is scaled up by `n_columns / n_common`.
//!
//! Policy when neighbours are scarce:
//! - K shrinks to the number of usable donors;
//! - a receiver that shares no observed coordinate with any donor gets the
//!   column mean (always the case for one-column matrices);
//! - a column with no observed value at all is an error.
//!
//! Distances are computed on the input matrix only; estimates never feed
//! other estimates. Observed cells are copied through untouched.

use crate::domain::Matrix;
use thiserror::Error;

/// Neighbour count used by the pipeline.
pub const DEFAULT_NEIGHBORS: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ImputeError {
    #[error("neighbour count must be at least 1")]
    ZeroNeighbors,

    #[error("column '{0}' has no observed values to impute from")]
    EmptyColumn(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnnImputer {
    n_neighbors: usize,
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self {
            n_neighbors: DEFAULT_NEIGHBORS,
        }
    }
}

impl KnnImputer {
    pub fn new(n_neighbors: usize) -> Result<Self, ImputeError> {
        if n_neighbors == 0 {
            return Err(ImputeError::ZeroNeighbors);
        }
        Ok(Self { n_neighbors })
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Fill every missing cell. Shape, index and column names are preserved.
    pub fn impute(&self, matrix: &Matrix) -> Result<Matrix, ImputeError> {
        let n_rows = matrix.n_rows();
        let rows: Vec<Vec<Option<f64>>> = (0..n_rows).map(|r| matrix.row(r)).collect();
        let mut out = matrix.clone();

        for col in 0..matrix.n_cols() {
            if matrix.column_missing_count(col) == 0 {
                continue;
            }
            let column = matrix.column_at(col);

            let donors: Vec<usize> = (0..n_rows).filter(|&r| column[r].is_some()).collect();
            if donors.is_empty() {
                return Err(ImputeError::EmptyColumn(matrix.column_names()[col].clone()));
            }
            let column_mean = column.iter().flatten().sum::<f64>() / donors.len() as f64;

            for receiver in (0..n_rows).filter(|&r| column[r].is_none()) {
                let mut ranked: Vec<(f64, usize)> = donors
                    .iter()
                    .filter_map(|&d| {
                        nan_euclidean(&rows[receiver], &rows[d]).map(|dist| (dist, d))
                    })
                    .collect();

                let estimate = if ranked.is_empty() {
                    column_mean
                } else {
                    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                    let k = self.n_neighbors.min(ranked.len());
                    let sum: f64 = ranked[..k].iter().filter_map(|&(_, d)| column[d]).sum();
                    sum / k as f64
                };

                out.set(receiver, col, estimate);
            }
        }

        Ok(out)
    }
}

/// NaN-aware Euclidean distance between two rows of equal width.
///
/// `None` when the rows share no observed coordinate.
pub fn nan_euclidean(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    let mut common = 0usize;
    for (x, y) in a.iter().zip(b) {
        if let (Some(x), Some(y)) = (x, y) {
            sum += (x - y) * (x - y);
            common += 1;
        }
    }
    if common == 0 {
        return None;
    }
    Some((a.len() as f64 / common as f64 * sum).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn matrix(columns: &[(&str, Vec<Option<f64>>)]) -> Matrix {
        let n = columns.first().map_or(0, |c| c.1.len());
        let index = (0..n)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64))
            .collect();
        let mut m = Matrix::new(index);
        for (name, cells) in columns {
            m.push_column(*name, cells.clone()).unwrap();
        }
        m
    }

    #[test]
    fn zero_neighbours_rejected() {
        assert_eq!(KnnImputer::new(0), Err(ImputeError::ZeroNeighbors));
    }

    #[test]
    fn nan_euclidean_scales_by_observed_share() {
        let a = [Some(1.0), None, Some(3.0)];
        let b = [Some(2.0), Some(5.0), None];
        // one common coordinate out of three: sqrt(3/1 * 1)
        assert!((nan_euclidean(&a, &b).unwrap() - 3f64.sqrt()).abs() < 1e-12);
        assert_eq!(nan_euclidean(&[None, Some(1.0)], &[Some(1.0), None]), None);
    }

    #[test]
    fn fills_from_nearest_rows() {
        let m = matrix(&[
            ("a", vec![Some(1.0), Some(2.0), Some(3.0), Some(100.0)]),
            ("b", vec![Some(10.0), Some(20.0), None, Some(1000.0)]),
        ]);

        let imputed = KnnImputer::new(2).unwrap().impute(&m).unwrap();

        // rows 1 and 0 are the two closest to row 2 on column a
        assert_eq!(imputed.get(2, 1), Some(15.0));
        assert!(imputed.is_complete());
    }

    #[test]
    fn k_shrinks_to_available_donors() {
        let m = matrix(&[
            ("a", vec![Some(1.0), Some(2.0), Some(3.0)]),
            ("b", vec![Some(10.0), Some(20.0), None]),
        ]);
        let imputed = KnnImputer::default().impute(&m).unwrap();
        assert_eq!(imputed.get(2, 1), Some(15.0));
    }

    #[test]
    fn single_column_falls_back_to_column_mean() {
        let m = matrix(&[("Energy", vec![Some(10.0), None, Some(20.0), None, Some(30.0)])]);

        let imputed = KnnImputer::default().impute(&m).unwrap();

        assert_eq!(
            imputed.column("Energy").unwrap(),
            &[Some(10.0), Some(20.0), Some(20.0), Some(20.0), Some(30.0)]
        );
    }

    #[test]
    fn observed_cells_untouched() {
        let m = matrix(&[
            ("a", vec![Some(1.5), None, Some(7.25)]),
            ("b", vec![None, Some(4.0), Some(-2.0)]),
        ]);
        let imputed = KnnImputer::default().impute(&m).unwrap();
        assert_eq!(imputed.get(0, 0), Some(1.5));
        assert_eq!(imputed.get(2, 0), Some(7.25));
        assert_eq!(imputed.get(1, 1), Some(4.0));
        assert_eq!(imputed.get(2, 1), Some(-2.0));
        assert_eq!(imputed.index(), m.index());
        assert_eq!(imputed.column_names(), m.column_names());
    }

    #[test]
    fn all_missing_column_is_an_error() {
        let m = matrix(&[("Tech", vec![None, None])]);
        assert_eq!(
            KnnImputer::default().impute(&m),
            Err(ImputeError::EmptyColumn("Tech".into()))
        );
    }

    #[test]
    fn complete_matrix_is_unchanged() {
        let m = matrix(&[("a", vec![Some(1.0), Some(2.0)])]);
        assert_eq!(KnnImputer::default().impute(&m).unwrap(), m);
    }
}
