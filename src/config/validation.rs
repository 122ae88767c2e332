//! Validation engine for selection specs.
//!
//! The engine runs all registered [`ValidationRule`]s against a
//! [`SelectionSpec`] and collects every diagnostic into a
//! [`ValidationReport`]. It never stops at the first error, so users see all
//! problems at once.
//!
//! # Quick start
//!
//! ```rust
//! use rapid_subset::config::{SelectionSpec, ValidationEngine};
//!
//! let spec = SelectionSpec::from_json(r#"{ "v": 1, "k": 5, "colour": "red" }"#).unwrap();
//! let report = ValidationEngine::with_defaults().validate(&spec);
//! assert!(report.is_valid());
//! assert_eq!(report.warnings().count(), 1);
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::spec::{ObjectiveType, SelectionSpec, SPEC_VERSION};
use crate::errors::ErrorCode;

// ─── Spec error ─────────────────────────────────────────────────────────────

/// A problem found in a spec, located by JSON pointer.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{path}: {message}")]
pub struct SpecError {
    pub code: ErrorCode,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl SpecError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: SpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: SpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: SpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &SpecError> + '_ {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| &d.error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &SpecError> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &SpecError> {
        self.by_severity(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// No errors; warnings are acceptable.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a [`SelectionSpec`] and returns
/// zero or more diagnostics.
pub trait ValidationRule: Send + Sync {
    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a [`SelectionSpec`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Version, objective parameter, warm-start budget and unknown-field
    /// checks.
    pub fn with_defaults() -> Self {
        Self {
            rules: vec![
                Box::new(VersionRule),
                Box::new(ObjectiveParamsRule),
                Box::new(GreedyBudgetRule),
                Box::new(UnknownFieldsRule),
            ],
        }
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Every diagnostic from every rule, in rule order.
    pub fn validate(&self, spec: &SelectionSpec) -> ValidationReport {
        ValidationReport {
            diagnostics: self.rules.iter().flat_map(|rule| rule.validate(spec)).collect(),
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Supported spec version ──────────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            SpecError::new(
                ErrorCode::Configuration,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Parameters that belong to the other objective ───────────────────────

struct ObjectiveParamsRule;

impl ValidationRule for ObjectiveParamsRule {
    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        let (field, set) = match spec.objective {
            ObjectiveType::FacilityLocation => {
                ("concave_transform", spec.concave_transform.is_some())
            }
            ObjectiveType::FeatureBased => ("similarity_kernel", spec.similarity_kernel.is_some()),
        };

        if set {
            vec![ValidationDiagnostic::warning(
                SpecError::new(
                    ErrorCode::IgnoredValue,
                    format!("/{field}"),
                    format!("{field} is ignored by {}", spec.objective.as_str()),
                )
                .with_hint(format!("Remove {field}")),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 3. Warm-start budget larger than k ─────────────────────────────────────

struct GreedyBudgetRule;

impl ValidationRule for GreedyBudgetRule {
    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        match spec.n_greedy_samples {
            Some(n) if n > spec.k => vec![ValidationDiagnostic::warning(
                SpecError::new(
                    ErrorCode::IgnoredValue,
                    "/n_greedy_samples",
                    format!("n_greedy_samples {n} exceeds k {}; clamped to k", spec.k),
                )
                .with_hint("Set n_greedy_samples at most k"),
            )],
            _ => vec![],
        }
    }
}

// ─── 4. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    SpecError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn validate(&self, spec: &SelectionSpec) -> Vec<ValidationDiagnostic> {
        Self::check_unknowns("", &spec.unknown_fields, spec.strict)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
