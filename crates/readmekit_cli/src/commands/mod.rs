//! CLI command definitions.
//!
//! Three operations over the same inputs: generate renders the canonical
//! document, validate checks an existing document, diff compares an
//! existing document to a fresh render.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use readmekit_spec::{RawRules, ReadmeSpec, RepoMetadata, RuleSet, SpecLoader};

use crate::storage;

pub mod diff;
pub mod generate;
pub mod validate;

/// How a command ended when no fatal error occurred.
pub enum Outcome {
    Clean,
    ReportedFailure,
}

/// readmekit - canonical READMEs from a structured spec
#[derive(Parser)]
#[command(name = "readmekit")]
#[command(version, about = "Generate, validate, and diff READMEs from a structured spec")]
#[command(long_about = r#"
readmekit turns an explicit README specification plus external rule tables
into a canonical document, checks an existing document against the same
rules, and reports drift at section granularity.

EXIT CODES:
  0 - Success / empty report
  1 - Validation failure or drift detected
  2 - Fatal error (schema, rule tables, rendering, storage)
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the canonical README from the spec and rule tables
    Generate(generate::GenerateArgs),

    /// Check an existing README against the spec and rules
    Validate(validate::ValidateArgs),

    /// Compare an existing README against a fresh render
    Diff(diff::DiffArgs),
}

/// Inputs shared by every subcommand.
#[derive(Args)]
pub struct InputArgs {
    /// Path to the README specification
    #[arg(long, default_value = "README_SPEC.yaml")]
    pub spec: PathBuf,

    /// Path to the section order/requiredness table
    #[arg(long, default_value = "spec/sections.yaml")]
    pub sections: PathBuf,

    /// Path to the validation rule table
    #[arg(long, default_value = "spec/rules.yaml")]
    pub rules: PathBuf,

    /// Path to the tone lexicon table
    #[arg(long, default_value = "spec/tone.yaml")]
    pub tone: PathBuf,

    /// Repository root used to collect repo-map facts
    #[arg(long, default_value = ".")]
    pub repo_root: PathBuf,
}

impl InputArgs {
    /// Read and load the spec and the three rule tables.
    pub fn load(&self) -> Result<(ReadmeSpec, RuleSet)> {
        let raw_spec = storage::read(&self.spec)?;
        let raw_sections = storage::read(&self.sections)?;
        let raw_validation = storage::read(&self.rules)?;
        let raw_tone = storage::read(&self.tone)?;

        let raw_rules = RawRules {
            sections: &raw_sections,
            validation: &raw_validation,
            tone: &raw_tone,
        };
        Ok(SpecLoader::load(&raw_spec, &raw_rules)?)
    }

    /// Collect repository facts for the paths the spec names.
    ///
    /// This is the metadata adapter: the core only ever sees the resulting
    /// map, never the filesystem.
    pub fn repo_metadata(&self, spec: &ReadmeSpec) -> RepoMetadata {
        spec.repo_map
            .iter()
            .map(|entry| {
                (
                    entry.path.clone(),
                    self.repo_root.join(&entry.path).exists(),
                )
            })
            .collect()
    }
}
