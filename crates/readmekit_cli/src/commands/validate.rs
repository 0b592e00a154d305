//! Validate command - check an existing README against the spec and rules.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use readmekit_policy::RuleValidator;
use readmekit_render::Document;

use crate::commands::{InputArgs, Outcome};
use crate::storage;

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Path to the README to check
    #[arg(long, default_value = "README.md")]
    pub readme: PathBuf,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ValidateArgs) -> Result<Outcome> {
    let (spec, rules) = args.inputs.load()?;
    let text = storage::read(&args.readme)?;
    let document = Document::parse(&text);

    let report = RuleValidator::new().validate(&document, &spec, &rules)?;
    info!("{} violation(s)", report.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_empty() {
        println!("OK: {} matches the spec", args.readme.display());
    } else {
        println!("FAIL: {} does not match the spec", args.readme.display());
        for violation in &report.violations {
            match &violation.section {
                Some(section) => println!(
                    "- [{}] {} (section: {})",
                    violation.rule_id, violation.message, section
                ),
                None => println!("- [{}] {}", violation.rule_id, violation.message),
            }
        }
    }

    Ok(if report.is_empty() {
        Outcome::Clean
    } else {
        Outcome::ReportedFailure
    })
}
