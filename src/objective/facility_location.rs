//! Facility location objective
//!
//! `f(S) = Σ_j max_{i ∈ S} sim[j, i]`: every item in the universe is credited
//! with its best similarity to anything selected. Picking a second item that
//! covers the same neighbourhood adds almost nothing, which drives the
//! selection towards representatives of distinct regions.

use super::Objective;
use crate::errors::Result;
use crate::matrix::{DenseMatrix, SimilarityKernel};

/// Per-item best coverage from the selected set.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageState {
    current_values: Vec<f64>,
}

impl CoverageState {
    /// `current_values[j] = max_{i ∈ S} sim[j, i]`
    pub fn current_values(&self) -> &[f64] {
        &self.current_values
    }
}

/// Facility location over a fixed n×n similarity matrix
#[derive(Debug, Clone)]
pub struct FacilityLocation {
    /// Transposed similarity: `columns.row(i)` is `sim[:, i]`, contiguous.
    columns: DenseMatrix,
}

impl FacilityLocation {
    /// Use `similarity` as-is
    ///
    /// The matrix must be square and non-negative off the diagonal; the
    /// diagonal is zeroed so an item earns no credit for covering itself.
    pub fn new(similarity: DenseMatrix) -> Result<Self> {
        let similarity = SimilarityKernel::Precomputed.build(&similarity)?;
        Ok(Self {
            columns: similarity.transpose(),
        })
    }

    /// Build the similarity matrix from feature rows with `kernel`
    pub fn from_features(data: &DenseMatrix, kernel: &SimilarityKernel) -> Result<Self> {
        let similarity = kernel.build(data)?;
        Ok(Self {
            columns: similarity.transpose(),
        })
    }

    /// Similarity between `j` and `i` as seen by the objective
    pub fn similarity(&self, j: usize, i: usize) -> f64 {
        self.columns.get(i, j)
    }
}

impl Objective for FacilityLocation {
    type State = CoverageState;

    fn name(&self) -> &'static str {
        "facility_location"
    }

    fn num_items(&self) -> usize {
        self.columns.rows()
    }

    fn initial_state(&self) -> CoverageState {
        CoverageState {
            current_values: vec![0.0; self.columns.rows()],
        }
    }

    #[inline]
    fn marginal_gain(&self, item: usize, state: &CoverageState) -> f64 {
        self.columns
            .row(item)
            .iter()
            .zip(&state.current_values)
            .map(|(&sim, &cur)| if sim > cur { sim - cur } else { 0.0 })
            .sum()
    }

    fn commit(&self, item: usize, state: &mut CoverageState) {
        for (cur, &sim) in state.current_values.iter_mut().zip(self.columns.row(item)) {
            if sim > *cur {
                *cur = sim;
            }
        }
    }

    fn value(&self, state: &CoverageState) -> f64 {
        state.current_values.iter().sum()
    }
}
