//! Dataset storage and similarity construction
//!
//! Holds the dense numeric input in read-only form for the duration of a
//! selection, and the kernels that turn feature rows into pairwise
//! similarities.

pub mod dense;
pub mod similarity;

pub use dense::DenseMatrix;
pub use similarity::{CustomKernel, SimilarityKernel};
