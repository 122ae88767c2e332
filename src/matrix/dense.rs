//! Row-major dense matrix
//!
//! Holds either an n×d feature matrix or an n×n similarity matrix. Rows are
//! stored contiguously, which is what the gain kernel iterates over.

use crate::errors::{Error, Result};

/// A dense `rows × cols` matrix of `f64` in row-major order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Wrap a flat row-major buffer
    ///
    /// Fails with an input shape error if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::shape(format!("{rows}x{cols} overflows usize")))?;
        if data.len() != expected {
            return Err(Error::shape(format!(
                "expected {expected} values for a {rows}x{cols} matrix, got {}",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from a list of rows, rejecting ragged input
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::shape(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// A matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of rows (items)
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Check if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Get the value at `(i, j)`
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    /// Iterate over rows
    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact(0) panics; a zero-column matrix has no data anyway
        self.data.chunks_exact(self.cols.max(1))
    }

    /// The flat row-major buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the flat row-major buffer
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Transposed copy
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Set every diagonal entry to `value`
    pub fn fill_diagonal(&mut self, value: f64) {
        for i in 0..self.rows.min(self.cols) {
            self.data[i * self.cols + i] = value;
        }
    }

    /// Copy the given rows, in the given order, into a new matrix
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Reject negative or non-finite entries
    ///
    /// Reports the first offending entry in row-major order.
    pub fn ensure_non_negative(&self) -> Result<()> {
        for (idx, &value) in self.data.iter().enumerate() {
            let reason = if !value.is_finite() {
                "is not finite"
            } else if value < 0.0 {
                "is negative"
            } else {
                continue;
            };
            let cols = self.cols.max(1);
            return Err(Error::InputDomain {
                row: idx / cols,
                col: idx % cols,
                value,
                reason,
            });
        }
        Ok(())
    }
}
