//! Error types for rendering.

use thiserror::Error;

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Configuration bugs caught while rendering.
///
/// These are section-rule/spec mismatches, distinct from the missing-field
/// schema errors the loader reports.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("section '{section}' references unknown spec field: {field}")]
    UnknownField { section: String, field: String },

    #[error("section '{section}' expects a {expected} in field '{field}'")]
    FieldMismatch {
        section: String,
        field: String,
        expected: &'static str,
    },

    #[error("section '{section}' render kind requires a field but none is configured")]
    MissingField { section: String },

    #[error("unknown tone profile: {0}")]
    UnknownToneProfile(String),

    #[error("rendered document length {actual} exceeds max_length {limit}")]
    LengthExceeded { actual: usize, limit: usize },
}
