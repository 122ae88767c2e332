//! Feature-based objective
//!
//! `f(S) = Σ_f phi(Σ_{i ∈ S} X[i, f]) - phi(0)`. Items are rewarded for
//! raising features that the selection has not saturated yet.

use super::transform::ConcaveTransform;
use super::Objective;
use crate::errors::{Error, Result};
use crate::matrix::DenseMatrix;

/// Accumulated feature totals and their transformed values.
#[derive(Debug, Clone, PartialEq)]
pub struct SaturationState {
    current_values: Vec<f64>,
    current_concave_values: Vec<f64>,
}

impl SaturationState {
    /// `Σ_{i ∈ S} X[i]`
    pub fn current_values(&self) -> &[f64] {
        &self.current_values
    }

    /// `phi(current_values)`
    pub fn current_concave_values(&self) -> &[f64] {
        &self.current_concave_values
    }
}

/// Feature-based objective over an n×d non-negative feature matrix
#[derive(Debug, Clone)]
pub struct FeatureBased {
    features: DenseMatrix,
    transform: ConcaveTransform,
}

impl FeatureBased {
    /// Rejects negative or non-finite features before anything else runs,
    /// and transforms that are not finite at 0.
    pub fn new(features: DenseMatrix, transform: ConcaveTransform) -> Result<Self> {
        features.ensure_non_negative()?;
        let base = transform.apply(0.0);
        if !base.is_finite() {
            return Err(Error::config(format!(
                "{} transform must be finite at 0, got {base}",
                transform.as_str()
            )));
        }
        Ok(Self {
            features,
            transform,
        })
    }
}

impl Objective for FeatureBased {
    type State = SaturationState;

    fn name(&self) -> &'static str {
        "feature_based"
    }

    fn num_items(&self) -> usize {
        self.features.rows()
    }

    fn initial_state(&self) -> SaturationState {
        let d = self.features.cols();
        let current_values = vec![0.0; d];
        let mut current_concave_values = vec![0.0; d];
        self.transform
            .apply_all(&current_values, &mut current_concave_values);
        SaturationState {
            current_values,
            current_concave_values,
        }
    }

    #[inline]
    fn marginal_gain(&self, item: usize, state: &SaturationState) -> f64 {
        self.features
            .row(item)
            .iter()
            .zip(&state.current_values)
            .zip(&state.current_concave_values)
            .map(|((&x, &cur), &concave)| self.transform.apply(cur + x) - concave)
            .sum()
    }

    fn commit(&self, item: usize, state: &mut SaturationState) {
        for (cur, &x) in state.current_values.iter_mut().zip(self.features.row(item)) {
            *cur += x;
        }
        // recomputed in full so the cache never drifts from the totals
        self.transform
            .apply_all(&state.current_values, &mut state.current_concave_values);
    }

    fn value(&self, state: &SaturationState) -> f64 {
        let base = self.transform.apply(0.0);
        state
            .current_concave_values
            .iter()
            .map(|&c| c - base)
            .sum()
    }
}
