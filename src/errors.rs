//! Error types for subset selection
//!
//! Every failure is detected before any selection is committed, so a call
//! either returns a complete ranking or one of these errors.

use serde::Serialize;

/// Stable, machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Dataset is not a well-formed two-dimensional array.
    InputShape,
    /// Dataset contains values outside the objective's domain.
    InputDomain,
    /// Unrecognized name, inconsistent option, or unsatisfiable request.
    Configuration,
    /// Lazy queue ran out of candidates mid-round.
    EmptyQueue,
    /// A configuration spec carries a field nobody reads.
    UnknownField,
    /// A configuration value is accepted but adjusted or ignored.
    IgnoredValue,
}

impl ErrorCode {
    /// Returns the snake_case name used in JSON and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputShape => "input_shape",
            Self::InputDomain => "input_domain",
            Self::Configuration => "configuration",
            Self::EmptyQueue => "empty_queue",
            Self::UnknownField => "unknown_field",
            Self::IgnoredValue => "ignored_value",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by selection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Input shape error: {reason}")]
    InputShape { reason: String },

    #[error("Input domain error at ({row}, {col}): {value} {reason}")]
    InputDomain {
        row: usize,
        col: usize,
        value: f64,
        reason: &'static str,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Queue exhausted in round {round}: requested {requested} items, {available} available")]
    EmptyQueue {
        round: usize,
        requested: usize,
        available: usize,
    },
}

impl Error {
    /// Shorthand for an [`Error::InputShape`].
    pub fn shape(reason: impl Into<String>) -> Self {
        Self::InputShape {
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`Error::Configuration`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InputShape { .. } => ErrorCode::InputShape,
            Self::InputDomain { .. } => ErrorCode::InputDomain,
            Self::Configuration(_) => ErrorCode::Configuration,
            Self::EmptyQueue { .. } => ErrorCode::EmptyQueue,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
