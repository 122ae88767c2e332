//! Core configuration and result types

use serde::Serialize;

use crate::errors::{Error, Result};
use crate::greedy::scheduler::GreedySelector;
use crate::matrix::DenseMatrix;
use crate::objective::ObjectiveKind;

/// Default number of items to select.
pub const DEFAULT_K: usize = 10;

/// Configuration for one selection call
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// Number of items to select
    pub k: usize,
    /// Objective and its parameters
    pub objective: ObjectiveKind,
    /// Dense warm-start rounds; `None` uses the objective's default.
    /// Values above `k` are clamped to `k`.
    pub n_greedy_samples: Option<usize>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            objective: ObjectiveKind::default(),
            n_greedy_samples: None,
        }
    }
}

impl SelectionConfig {
    /// Create a config for `k` items under `objective`
    pub fn new(k: usize, objective: ObjectiveKind) -> Self {
        Self {
            k,
            objective,
            n_greedy_samples: None,
        }
    }

    /// Set the number of items to select
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the objective
    pub fn with_objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = objective;
        self
    }

    /// Set the dense warm-start length
    pub fn with_greedy_samples(mut self, n: usize) -> Self {
        self.n_greedy_samples = Some(n);
        self
    }

    /// Warm-start length actually used: the configured or default value,
    /// clamped to `k`.
    pub fn greedy_samples(&self) -> usize {
        self.n_greedy_samples
            .unwrap_or_else(|| self.objective.default_greedy_samples())
            .min(self.k)
    }

    /// Scheduler for this configuration
    pub fn selector(&self) -> GreedySelector {
        GreedySelector::new(self.k).with_greedy_samples(self.greedy_samples())
    }
}

/// Outcome of a selection: items in the order they were picked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Selected item indices, first-selected first
    pub ranking: Vec<usize>,
    /// Marginal gain of each ranked item when it was selected
    pub gains: Vec<f64>,
    /// `f(S) - f(∅)` of the final selection
    pub objective_value: f64,
    /// Total marginal gains computed, across both phases
    pub evaluations: usize,
}

impl Selection {
    /// Number of selected items
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    /// Check if nothing was selected
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// Rows of `data` in selection order
    pub fn subset(&self, data: &DenseMatrix) -> Result<DenseMatrix> {
        if let Some(&bad) = self.ranking.iter().find(|&&i| i >= data.rows()) {
            return Err(Error::shape(format!(
                "selected index {bad} out of range for {} rows",
                data.rows()
            )));
        }
        Ok(data.select_rows(&self.ranking))
    }

    /// Entries of `labels` in selection order
    pub fn pick<T: Clone>(&self, labels: &[T]) -> Result<Vec<T>> {
        self.ranking
            .iter()
            .map(|&i| {
                labels.get(i).cloned().ok_or_else(|| {
                    Error::shape(format!(
                        "selected index {i} out of range for {} labels",
                        labels.len()
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::matrix::SimilarityKernel;
    use crate::objective::ConcaveTransform;

    fn selection() -> Selection {
        Selection {
            ranking: vec![2, 0],
            gains: vec![3.0, 1.0],
            objective_value: 4.0,
            evaluations: 5,
        }
    }

    #[test]
    fn test_greedy_samples_defaults_per_objective() {
        let fl = SelectionConfig::new(
            1000,
            ObjectiveKind::facility_location(SimilarityKernel::Cosine),
        );
        assert_eq!(fl.greedy_samples(), 250);

        let fb = SelectionConfig::new(1000, ObjectiveKind::feature_based(ConcaveTransform::Sqrt));
        assert_eq!(fb.greedy_samples(), 3);
    }

    #[test]
    fn test_greedy_samples_clamped_to_k() {
        let cfg = SelectionConfig::default().with_k(4);
        assert_eq!(cfg.greedy_samples(), 4);
        let cfg = cfg.with_greedy_samples(100);
        assert_eq!(cfg.greedy_samples(), 4);
        let cfg = cfg.with_greedy_samples(0);
        assert_eq!(cfg.greedy_samples(), 0);
    }

    #[test]
    fn test_subset_in_selection_order() {
        let data = DenseMatrix::from_rows(&[[0.0], [1.0], [2.0]]).unwrap();
        let sub = selection().subset(&data).unwrap();
        assert_eq!(sub.as_slice(), &[2.0, 0.0]);
    }

    #[test]
    fn test_subset_out_of_range() {
        let data = DenseMatrix::from_rows(&[[0.0]]).unwrap();
        let err = selection().subset(&data).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InputShape);
    }

    #[test]
    fn test_pick_labels() {
        let labels = ["a", "b", "c"];
        assert_eq!(selection().pick(&labels).unwrap(), vec!["c", "a"]);
        assert!(selection().pick(&labels[..1]).is_err());
    }
}
