//! Date-indexed matrix with named columns and optional cells.
//!
//! Storage is column-major: each column is a `Vec<Option<f64>>` with exactly
//! one cell per index date. `None` marks a missing entry.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("column '{column}' has {actual} cells, index has {expected} dates")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("matrices are indexed by different calendars")]
    IndexMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    index: Vec<NaiveDate>,
    names: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl Matrix {
    /// An empty matrix (no columns) over `index`.
    pub fn new(index: Vec<NaiveDate>) -> Self {
        Self {
            index,
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Append a column. The cell count must match the index length.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        cells: Vec<Option<f64>>,
    ) -> Result<(), MatrixError> {
        let name = name.into();
        if cells.len() != self.index.len() {
            return Err(MatrixError::LengthMismatch {
                column: name,
                expected: self.index.len(),
                actual: cells.len(),
            });
        }
        if self.names.contains(&name) {
            return Err(MatrixError::DuplicateColumn(name));
        }
        self.names.push(name);
        self.columns.push(cells);
        Ok(())
    }

    /// Append every column of `other`, which must share this index.
    pub fn extend(&mut self, other: &Matrix) -> Result<(), MatrixError> {
        if other.index != self.index {
            return Err(MatrixError::IndexMismatch);
        }
        for (name, cells) in other.names.iter().zip(&other.columns) {
            self.push_column(name.clone(), cells.clone())?;
        }
        Ok(())
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn column_at(&self, col: usize) -> &[Option<f64>] {
        &self.columns[col]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.columns[col][row]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.columns[col][row] = Some(value);
    }

    /// The cells of one row, in column order.
    pub fn row(&self, row: usize) -> Vec<Option<f64>> {
        self.columns.iter().map(|c| c[row]).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.iter().filter(|v| v.is_none()).count())
            .sum()
    }

    pub fn column_missing_count(&self, col: usize) -> usize {
        self.columns[col].iter().filter(|v| v.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }
}
