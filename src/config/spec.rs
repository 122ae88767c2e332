//! Selection specification.
//!
//! A [`SelectionSpec`] is the JSON form of a [`SelectionConfig`]. It is
//! checked by the [`ValidationEngine`] before conversion, so a typo in a
//! field name surfaces as a diagnostic instead of being silently dropped.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "objective": "facility_location",
//!   "k": 50,
//!   "n_greedy_samples": 250,
//!   "similarity_kernel": "cosine",
//!   "strict": false
//! }
//! ```
//!
//! Custom kernels and transforms are functions and have no JSON form; build
//! a [`SelectionConfig`] directly for those.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::validation::ValidationEngine;
use crate::errors::{Error, Result};
use crate::matrix::SimilarityKernel;
use crate::objective::{ConcaveTransform, ObjectiveKind};
use crate::types::{SelectionConfig, DEFAULT_K};

/// Current spec version.
pub const SPEC_VERSION: u32 = 1;

/// Top-level selection specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    #[serde(default)]
    pub objective: ObjectiveType,

    /// Number of items to select.
    #[serde(default = "default_k")]
    pub k: usize,

    /// Dense warm-start rounds. Omitted means the objective's default.
    #[serde(default)]
    pub n_greedy_samples: Option<usize>,

    /// Facility location only.
    #[serde(default)]
    pub similarity_kernel: Option<SimilarityKernel>,

    /// Feature based only.
    #[serde(default)]
    pub concave_transform: Option<ConcaveTransform>,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

fn default_k() -> usize {
    DEFAULT_K
}

/// Objective selector in a spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    #[default]
    FacilityLocation,
    FeatureBased,
}

impl ObjectiveType {
    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FacilityLocation => "facility_location",
            Self::FeatureBased => "feature_based",
        }
    }
}

impl SelectionSpec {
    /// Parse a spec from JSON. Unknown kernel, transform or objective names
    /// fail here with [`Error::Configuration`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("invalid selection spec: {e}")))
    }

    /// Validate with the default rules and convert.
    ///
    /// Error diagnostics are joined into one [`Error::Configuration`];
    /// warnings are logged and otherwise ignored.
    pub fn to_config(&self) -> Result<SelectionConfig> {
        let report = ValidationEngine::with_defaults().validate(self);
        if report.has_errors() {
            let messages: Vec<String> = report.errors().map(ToString::to_string).collect();
            return Err(Error::config(messages.join("; ")));
        }

        #[cfg(feature = "tracing")]
        for warning in report.warnings() {
            tracing::warn!(code = %warning.code, path = %warning.path, "{}", warning.message);
        }

        let objective = match self.objective {
            ObjectiveType::FacilityLocation => ObjectiveKind::FacilityLocation {
                kernel: self.similarity_kernel.clone().unwrap_or_default(),
            },
            ObjectiveType::FeatureBased => ObjectiveKind::FeatureBased {
                transform: self.concave_transform.clone().unwrap_or_default(),
            },
        };

        Ok(SelectionConfig {
            k: self.k,
            objective,
            n_greedy_samples: self.n_greedy_samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_defaults() {
        let cfg = SelectionSpec::from_json(r#"{ "v": 1 }"#)
            .unwrap()
            .to_config()
            .unwrap();
        assert_eq!(cfg.k, DEFAULT_K);
        assert!(matches!(
            cfg.objective,
            ObjectiveKind::FacilityLocation {
                kernel: SimilarityKernel::Correlation
            }
        ));
        assert_eq!(cfg.n_greedy_samples, None);
        assert_eq!(cfg.greedy_samples(), DEFAULT_K);
    }

    #[test]
    fn test_feature_based_with_alias() {
        let cfg = SelectionSpec::from_json(
            r#"{ "v": 1, "objective": "feature_based", "k": 4, "concave_transform": "log" }"#,
        )
        .unwrap()
        .to_config()
        .unwrap();
        assert!(matches!(
            cfg.objective,
            ObjectiveKind::FeatureBased {
                transform: ConcaveTransform::Log1p
            }
        ));
        assert_eq!(cfg.greedy_samples(), 3);
    }

    #[test]
    fn test_kernel_alias() {
        let spec = SelectionSpec::from_json(r#"{ "v": 1, "similarity_kernel": "corr" }"#).unwrap();
        assert!(matches!(
            spec.similarity_kernel,
            Some(SimilarityKernel::Correlation)
        ));
    }

    #[test]
    fn test_unknown_kernel_is_configuration_error() {
        let err = SelectionSpec::from_json(r#"{ "v": 1, "similarity_kernel": "manhattan" }"#)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Configuration);
    }

    #[test]
    fn test_unknown_objective_is_configuration_error() {
        let err = SelectionSpec::from_json(r#"{ "v": 1, "objective": "graph_cut" }"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Configuration);
    }

    #[test]
    fn test_strict_unknown_field_rejected() {
        let spec = SelectionSpec::from_json(r#"{ "v": 1, "strict": true, "kk": 3 }"#).unwrap();
        let err = spec.to_config().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Configuration);
        assert!(err.to_string().contains("/kk"));
    }

    #[test]
    fn test_warnings_do_not_block() {
        let cfg = SelectionSpec::from_json(
            r#"{ "v": 1, "k": 2, "n_greedy_samples": 250, "concave_transform": "sqrt", "kk": 3 }"#,
        )
        .unwrap()
        .to_config()
        .unwrap();
        assert_eq!(cfg.greedy_samples(), 2);
    }

    #[test]
    fn test_bad_version_rejected() {
        let err = SelectionSpec::from_json(r#"{ "v": 7 }"#)
            .unwrap()
            .to_config()
            .unwrap_err();
        assert!(err.to_string().contains("unsupported spec version 7"));
    }

    #[test]
    fn test_missing_version_is_configuration_error() {
        let err = SelectionSpec::from_json(r#"{ "k": 3 }"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Configuration);
    }
}
