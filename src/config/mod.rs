//! JSON selection specs and their validation.

pub mod spec;
pub mod validation;

pub use spec::{ObjectiveType, SelectionSpec, SPEC_VERSION};
pub use validation::{
    Severity, SpecError, ValidationDiagnostic, ValidationEngine, ValidationReport, ValidationRule,
};
