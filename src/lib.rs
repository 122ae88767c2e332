//! # rapid-subset
//!
//! Greedy submodular subset selection: pick `k` items from a dataset that
//! maximize a monotone submodular objective.
//!
//! Selection runs in two phases. The first `n_greedy_samples` rounds
//! recompute every candidate's marginal gain in parallel; the remaining
//! rounds use lazy evaluation, refreshing only candidates whose stale gain
//! could still win. Both phases produce the ranking a fully dense greedy
//! would.
//!
//! ## Objectives
//!
//! - **Facility location**: coverage through pairwise similarity, built with
//!   a [`SimilarityKernel`] or supplied precomputed.
//! - **Feature based**: concave saturation of accumulated non-negative
//!   features, shaped by a [`ConcaveTransform`].
//!
//! ## Quick start
//!
//! ```
//! use rapid_subset::{select, DenseMatrix, ObjectiveKind, SelectionConfig, SimilarityKernel};
//!
//! let data = DenseMatrix::from_rows(&[
//!     [1.0, 0.0, 0.2],
//!     [0.9, 0.1, 0.2],
//!     [0.0, 1.0, 0.7],
//!     [0.1, 0.9, 0.8],
//! ])
//! .unwrap();
//!
//! let config = SelectionConfig::new(2, ObjectiveKind::facility_location(SimilarityKernel::Cosine));
//! let selection = select(&data, &config).unwrap();
//! assert_eq!(selection.ranking.len(), 2);
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod errors;
pub mod greedy;
pub mod matrix;
pub mod objective;
pub mod selection;
pub mod types;

pub use config::SelectionSpec;
pub use errors::{Error, ErrorCode, Result};
pub use greedy::{GreedySelector, SelectionObserver};
pub use matrix::{DenseMatrix, SimilarityKernel};
pub use objective::{ConcaveTransform, FacilityLocation, FeatureBased, Objective, ObjectiveKind};
pub use selection::{select, select_from_spec, select_observed, select_with_labels};
pub use types::{Selection, SelectionConfig};
