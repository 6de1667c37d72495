//! Dataset combination: raw instrument columns followed by imputed sector columns.

use crate::domain::{Matrix, MatrixError};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CombineError {
    #[error("sector column '{column}' still has {missing} missing cells")]
    IncompleteSector { column: String, missing: usize },

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Reference-calendar-indexed table: instrument columns (may contain gaps)
/// then sector columns (complete).
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedDataset {
    matrix: Matrix,
    instrument_count: usize,
}

impl CombinedDataset {
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn index(&self) -> &[NaiveDate] {
        self.matrix.index()
    }

    pub fn n_rows(&self) -> usize {
        self.matrix.n_rows()
    }

    pub fn instrument_names(&self) -> &[String] {
        &self.matrix.column_names()[..self.instrument_count]
    }

    pub fn sector_names(&self) -> &[String] {
        &self.matrix.column_names()[self.instrument_count..]
    }

    pub fn instrument(&self, name: &str) -> Option<&[Option<f64>]> {
        if self.instrument_names().iter().any(|n| n == name) {
            self.matrix.column(name)
        } else {
            None
        }
    }

    pub fn sector(&self, name: &str) -> Option<&[Option<f64>]> {
        if self.sector_names().iter().any(|n| n == name) {
            self.matrix.column(name)
        } else {
            None
        }
    }

    /// BLAKE3 fingerprint over dates, column names and cell bits.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for name in self.matrix.column_names() {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
        }
        for (row, date) in self.index().iter().enumerate() {
            hasher.update(date.to_string().as_bytes());
            for col in 0..self.matrix.n_cols() {
                match self.matrix.get(row, col) {
                    Some(v) => hasher.update(&v.to_bits().to_le_bytes()),
                    None => hasher.update(&[0xff]),
                };
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Merge the raw instrument matrix with imputed sector matrices.
///
/// Sector matrices must share the instrument matrix's index and be complete.
/// No imputation happens here.
pub fn combine(instruments: &Matrix, sectors: &[Matrix]) -> Result<CombinedDataset, CombineError> {
    let mut matrix = instruments.clone();
    for sector in sectors {
        for col in 0..sector.n_cols() {
            let missing = sector.column_missing_count(col);
            if missing > 0 {
                return Err(CombineError::IncompleteSector {
                    column: sector.column_names()[col].clone(),
                    missing,
                });
            }
        }
        matrix.extend(sector)?;
    }

    Ok(CombinedDataset {
        matrix,
        instrument_count: instruments.n_cols(),
    })
}
