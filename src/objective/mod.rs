//! Submodular objectives
//!
//! An [`Objective`] owns the immutable dataset and knows how to score an item
//! against an aggregate of the current selection. The aggregate itself
//! ([`Objective::State`]) is owned by the scheduler, so the dataset can be
//! shared read-only across gain-kernel workers while the state only changes
//! between rounds.
//!
//! Two objectives ship with the crate ([`FacilityLocation`], [`FeatureBased`]),
//! selected by the closed [`ObjectiveKind`] tag. Callers needing something
//! else can plug a custom similarity kernel or concave transform into those,
//! or implement [`Objective`] directly.

pub mod facility_location;
pub mod feature_based;
pub mod transform;

pub use facility_location::{CoverageState, FacilityLocation};
pub use feature_based::{FeatureBased, SaturationState};
pub use transform::{ConcaveTransform, CustomTransform};

use crate::matrix::SimilarityKernel;

/// Warm-start budget used by facility location when none is given.
pub const FACILITY_LOCATION_GREEDY_SAMPLES: usize = 250;

/// Warm-start budget used by feature-based selection when none is given.
pub const FEATURE_BASED_GREEDY_SAMPLES: usize = 3;

/// A monotone submodular set function evaluated incrementally.
///
/// # Contract
///
/// - `marginal_gain(i, s)` is `f(S ∪ {i}) - f(S)` for the selection `S`
///   that produced `s`; it must be non-negative and must not grow as `S`
///   grows. The lazy phase of the scheduler is only exact under that
///   property.
/// - `marginal_gain` must be safe to call concurrently for distinct items
///   against the same state.
/// - `commit(i, s)` moves `s` from `S` to `S ∪ {i}`.
pub trait Objective: Sync {
    /// Running aggregate of the selected set.
    type State: Clone + Send + Sync;

    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Size of the candidate universe.
    fn num_items(&self) -> usize;

    /// Aggregate of the empty selection.
    fn initial_state(&self) -> Self::State;

    /// Gain of adding `item` to the selection described by `state`.
    fn marginal_gain(&self, item: usize, state: &Self::State) -> f64;

    /// Fold `item` into `state`.
    fn commit(&self, item: usize, state: &mut Self::State);

    /// `f(S) - f(∅)` for the selection described by `state`.
    fn value(&self, state: &Self::State) -> f64;
}

/// Which objective to maximize, with its parameters.
#[derive(Debug, Clone)]
pub enum ObjectiveKind {
    /// Coverage via pairwise similarity.
    FacilityLocation { kernel: SimilarityKernel },
    /// Concave saturation of accumulated features.
    FeatureBased { transform: ConcaveTransform },
}

impl Default for ObjectiveKind {
    fn default() -> Self {
        Self::FacilityLocation {
            kernel: SimilarityKernel::default(),
        }
    }
}

impl ObjectiveKind {
    pub fn facility_location(kernel: SimilarityKernel) -> Self {
        Self::FacilityLocation { kernel }
    }

    pub fn feature_based(transform: ConcaveTransform) -> Self {
        Self::FeatureBased { transform }
    }

    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FacilityLocation { .. } => "facility_location",
            Self::FeatureBased { .. } => "feature_based",
        }
    }

    /// Default dense warm-start length for this objective.
    pub fn default_greedy_samples(&self) -> usize {
        match self {
            Self::FacilityLocation { .. } => FACILITY_LOCATION_GREEDY_SAMPLES,
            Self::FeatureBased { .. } => FEATURE_BASED_GREEDY_SAMPLES,
        }
    }
}
