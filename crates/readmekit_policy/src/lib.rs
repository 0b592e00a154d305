//! # readmekit_policy
//!
//! Rule-driven validation for readmekit documents.
//!
//! `RuleValidator` runs the validation rule table against a document and a
//! spec: structural checks (required sections, declared order, audience
//! well-formedness), banned-term scans, total-length enforcement, tone
//! lexicon scans, and content fidelity per section kind.
//!
//! Violations accumulate in a `ValidationReport`; the report is the normal
//! return value and pass/fail is simply `report.is_empty()`. Errors are
//! reserved for configuration bugs such as unknown tone profiles.

pub mod error;
pub mod validator;

pub use error::{PolicyError, PolicyResult};
pub use validator::{RuleValidator, ValidationReport, Violation};
