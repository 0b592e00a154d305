//! # readmekit_spec
//!
//! Specification and rule-table models for readmekit.
//!
//! This crate defines the typed shapes the whole pipeline operates on and
//! the loader that turns raw YAML inputs into them:
//!
//! - **ReadmeSpec**: the structured README specification
//! - **RuleSet**: section order/requiredness rules, validation rule
//!   definitions, presentation labels, and the tone lexicon
//! - **SpecLoader**: schema-enforcing parser that collects every field
//!   problem into one error instead of failing one field at a time
//!
//! Both models are loaded once per invocation and treated as immutable
//! values for the remainder of that invocation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use readmekit_spec::{RawRules, SpecLoader};
//!
//! let raw_rules = RawRules {
//!     sections: "...",
//!     validation: "...",
//!     tone: "...",
//! };
//! let (spec, rules) = SpecLoader::load("...", &raw_rules).unwrap();
//! assert!(rules.tone_profile(&spec.constraints.tone_profile).is_some());
//! ```

pub mod error;
pub mod loader;
pub mod models;

pub use error::{FieldIssue, LoadError, RuleLoadError, SchemaError, SpecResult};
pub use loader::{RawRules, SpecLoader};
pub use models::*;
