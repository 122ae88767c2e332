//! Pairwise similarity kernels
//!
//! A kernel turns an n×d feature matrix into the n×n similarity matrix used by
//! facility location. Every kernel's output goes through the same
//! post-processing: the diagonal is zeroed and the result must be
//! non-negative.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::dense::DenseMatrix;
use crate::errors::{Error, Result};

/// Signature of a caller-supplied similarity function.
pub type KernelFn = dyn Fn(&DenseMatrix) -> DenseMatrix + Send + Sync;

/// A caller-supplied similarity function.
#[derive(Clone)]
pub struct CustomKernel(Arc<KernelFn>);

impl CustomKernel {
    pub fn new(f: impl Fn(&DenseMatrix) -> DenseMatrix + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomKernel(..)")
    }
}

/// How the similarity matrix is obtained from the input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKernel {
    /// Squared Pearson correlation between rows.
    #[default]
    #[serde(alias = "corr")]
    Correlation,
    /// Cosine of the angle between rows.
    Cosine,
    /// `max(D) - D[i, j]` where `D` holds squared euclidean distances.
    #[serde(alias = "euclidean")]
    NegativeSquaredEuclidean,
    /// The input already is the n×n similarity matrix.
    Precomputed,
    /// Caller-supplied function.
    #[serde(skip)]
    Custom(CustomKernel),
}

impl SimilarityKernel {
    /// Wrap a caller-supplied similarity function.
    pub fn custom(f: impl Fn(&DenseMatrix) -> DenseMatrix + Send + Sync + 'static) -> Self {
        Self::Custom(CustomKernel::new(f))
    }

    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correlation => "correlation",
            Self::Cosine => "cosine",
            Self::NegativeSquaredEuclidean => "negative_squared_euclidean",
            Self::Precomputed => "precomputed",
            Self::Custom(_) => "custom",
        }
    }

    /// Build the similarity matrix for `data`.
    ///
    /// The result is n×n with a zero diagonal and no negative entries;
    /// anything else is an input error.
    pub fn build(&self, data: &DenseMatrix) -> Result<DenseMatrix> {
        let n = data.rows();
        let mut sim = match self {
            Self::Correlation => {
                let mut sim = normalized_gram(data, true);
                sim.as_mut_slice().par_iter_mut().for_each(|r| *r *= *r);
                sim
            }
            Self::Cosine => normalized_gram(data, false),
            Self::NegativeSquaredEuclidean => shifted_squared_euclidean(data),
            Self::Precomputed => data.clone(),
            Self::Custom(CustomKernel(f)) => (**f)(data),
        };

        if sim.shape() != (n, n) {
            return Err(Error::shape(format!(
                "{} similarity must be {n}x{n}, got {}x{}",
                self.as_str(),
                sim.rows(),
                sim.cols()
            )));
        }

        sim.fill_diagonal(0.0);
        sim.ensure_non_negative()?;
        Ok(sim)
    }
}

impl FromStr for SimilarityKernel {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "correlation" | "corr" => Ok(Self::Correlation),
            "cosine" => Ok(Self::Cosine),
            "negative_squared_euclidean" | "euclidean" => Ok(Self::NegativeSquaredEuclidean),
            "precomputed" => Ok(Self::Precomputed),
            other => Err(Error::config(format!(
                "unknown similarity kernel \"{other}\"; expected correlation, cosine, \
                 negative_squared_euclidean, precomputed, or a custom function"
            ))),
        }
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Gram matrix of unit-normalized (optionally mean-centered) rows.
///
/// Zero-norm rows are left as zero vectors, so their similarity is 0.
fn normalized_gram(data: &DenseMatrix, center: bool) -> DenseMatrix {
    let n = data.rows();
    if data.cols() == 0 {
        return DenseMatrix::zeros(n, n);
    }

    let prepared: Vec<Vec<f64>> = data
        .row_iter()
        .map(|row| {
            let mean = if center {
                row.iter().sum::<f64>() / row.len() as f64
            } else {
                0.0
            };
            let mut v: Vec<f64> = row.iter().map(|x| x - mean).collect();
            let norm = dot(&v, &v).sqrt();
            if norm > 0.0 {
                v.iter_mut().for_each(|x| *x /= norm);
            } else {
                v.fill(0.0);
            }
            v
        })
        .collect();

    let mut out = DenseMatrix::zeros(n, n);
    out.as_mut_slice()
        .par_chunks_mut(n.max(1))
        .enumerate()
        .for_each(|(i, out_row)| {
            for (j, slot) in out_row.iter_mut().enumerate() {
                *slot = dot(&prepared[i], &prepared[j]);
            }
        });
    out
}

fn shifted_squared_euclidean(data: &DenseMatrix) -> DenseMatrix {
    let n = data.rows();
    if data.cols() == 0 {
        return DenseMatrix::zeros(n, n);
    }

    let sq_norms: Vec<f64> = data.row_iter().map(|r| dot(r, r)).collect();
    let mut out = DenseMatrix::zeros(n, n);
    out.as_mut_slice()
        .par_chunks_mut(n.max(1))
        .enumerate()
        .for_each(|(i, out_row)| {
            let xi = data.row(i);
            for (j, slot) in out_row.iter_mut().enumerate() {
                *slot = (sq_norms[i] + sq_norms[j] - 2.0 * dot(xi, data.row(j))).max(0.0);
            }
        });

    let max_dist = out.as_slice().par_iter().cloned().reduce(|| 0.0, f64::max);
    out.as_mut_slice()
        .par_iter_mut()
        .for_each(|d| *d = max_dist - *d);
    out
}
