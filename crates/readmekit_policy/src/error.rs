//! Error types for validation.
//!
//! Rule violations are never errors; they accumulate in the report. These
//! errors cover configuration bugs only.

use thiserror::Error;

use readmekit_render::RenderError;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("unknown tone profile: {0}")]
    UnknownToneProfile(String),

    #[error("failed to compile pattern '{pattern}': {message}")]
    PatternCompile { pattern: String, message: String },

    #[error(transparent)]
    Render(#[from] RenderError),
}
