//! Error types for spec and rule loading.

use thiserror::Error;

/// Result type alias for spec loading.
pub type SpecResult<T> = Result<T, LoadError>;

/// A single problem with one spec field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: problem.into(),
        }
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("\n- {}: {}", issue.field, issue.problem))
        .collect()
}

/// The specification is missing required fields or has malformed shapes.
///
/// Every offending field is collected before failing, so one load attempt
/// shows the complete picture.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("spec root must be a YAML mapping")]
    NotAMapping,

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("spec validation failed:{}", format_issues(.0))]
    Fields(Vec<FieldIssue>),
}

/// A rule table is malformed or internally inconsistent.
#[derive(Error, Debug)]
pub enum RuleLoadError {
    #[error("YAML parsing error in {table} table: {source}")]
    Yaml {
        table: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("sections table must define at least one section rule")]
    EmptySections,

    #[error("duplicate section rule id: {0}")]
    DuplicateSectionId(String),

    #[error("duplicate validation rule id: {0}")]
    DuplicateRuleId(String),

    #[error("spec references unknown tone profile: {0}")]
    UnknownToneProfile(String),

    #[error("invalid pattern '{pattern}' in tone profile '{profile}': {message}")]
    InvalidPattern {
        profile: String,
        pattern: String,
        message: String,
    },
}

/// Top-level loading error: either side of `SpecLoader::load` failed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Rules(#[from] RuleLoadError),
}
