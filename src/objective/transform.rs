//! Concave transforms for feature-based objectives
//!
//! The transform (phi) is applied element-wise to accumulated per-feature
//! totals. Its flattening slope is what makes a second item with the same
//! features worth less than the first.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Signature of a caller-supplied concave function.
pub type TransformFn = dyn Fn(f64) -> f64 + Send + Sync;

/// A caller-supplied concave function, applied element-wise.
#[derive(Clone)]
pub struct CustomTransform(Arc<TransformFn>);

impl CustomTransform {
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomTransform(..)")
    }
}

/// Concave, non-decreasing transform phi.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcaveTransform {
    /// `sqrt(x)`
    #[default]
    Sqrt,
    /// `ln(1 + x)`
    #[serde(alias = "log")]
    Log1p,
    /// `min(x, 1)`
    #[serde(alias = "min")]
    MinCapOne,
    /// `1 - 1 / (1 + x)`
    Inverse,
    /// Caller-supplied function.
    #[serde(skip)]
    Custom(CustomTransform),
}

impl ConcaveTransform {
    /// Wrap a caller-supplied concave function.
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(CustomTransform::new(f))
    }

    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Log1p => "log1p",
            Self::MinCapOne => "min_cap_one",
            Self::Inverse => "inverse",
            Self::Custom(_) => "custom",
        }
    }

    /// Apply phi to a single value.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Self::Sqrt => x.sqrt(),
            Self::Log1p => x.ln_1p(),
            Self::MinCapOne => x.min(1.0),
            Self::Inverse => 1.0 - 1.0 / (1.0 + x),
            Self::Custom(CustomTransform(f)) => (**f)(x),
        }
    }

    /// Apply phi to every element of `values`, writing into `out`.
    pub fn apply_all(&self, values: &[f64], out: &mut [f64]) {
        debug_assert_eq!(values.len(), out.len());
        for (o, &v) in out.iter_mut().zip(values) {
            *o = self.apply(v);
        }
    }
}

impl FromStr for ConcaveTransform {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "sqrt" => Ok(Self::Sqrt),
            "log1p" | "log" => Ok(Self::Log1p),
            "min_cap_one" | "min" => Ok(Self::MinCapOne),
            "inverse" => Ok(Self::Inverse),
            other => Err(Error::config(format!(
                "unknown concave transform \"{other}\"; expected sqrt, log1p, \
                 min_cap_one, inverse, or a custom function"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    const BUILTINS: [ConcaveTransform; 4] = [
        ConcaveTransform::Sqrt,
        ConcaveTransform::Log1p,
        ConcaveTransform::MinCapOne,
        ConcaveTransform::Inverse,
    ];

    #[test]
    fn test_builtins_are_zero_at_zero() {
        for t in &BUILTINS {
            assert_eq!(t.apply(0.0), 0.0, "{}", t.as_str());
        }
    }

    #[test]
    fn test_builtins_have_diminishing_increments() {
        for t in &BUILTINS {
            let mut prev_step = f64::INFINITY;
            for i in 0..20 {
                let x = i as f64 * 0.25;
                let step = t.apply(x + 0.25) - t.apply(x);
                assert!(step >= 0.0, "{} decreasing at {x}", t.as_str());
                assert!(step <= prev_step + 1e-12, "{} not concave at {x}", t.as_str());
                prev_step = step;
            }
        }
    }

    #[test]
    fn test_min_caps_at_one() {
        assert_eq!(ConcaveTransform::MinCapOne.apply(0.4), 0.4);
        assert_eq!(ConcaveTransform::MinCapOne.apply(7.0), 1.0);
    }

    #[test]
    fn test_custom_transform() {
        let t = ConcaveTransform::custom(|x| 2.0 * x.sqrt());
        assert_eq!(t.apply(4.0), 4.0);
        assert_eq!(t.as_str(), "custom");
    }

    #[test]
    fn test_apply_all() {
        let mut out = [0.0; 3];
        ConcaveTransform::Sqrt.apply_all(&[1.0, 4.0, 9.0], &mut out);
        assert_eq!(out, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_str_aliases_and_rejection() {
        assert!(matches!("log".parse(), Ok(ConcaveTransform::Log1p)));
        assert!(matches!("min".parse(), Ok(ConcaveTransform::MinCapOne)));
        let err = "cube".parse::<ConcaveTransform>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Configuration);
    }
}
