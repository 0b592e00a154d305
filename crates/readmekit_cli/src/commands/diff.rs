//! Diff command - compare an existing README against a fresh render.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use readmekit_diff::{ChangeKind, SemanticDiffer};
use readmekit_render::{Document, SectionRenderer};

use crate::commands::{InputArgs, Outcome};
use crate::storage;

#[derive(Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Path to the README to compare
    #[arg(long, default_value = "README.md")]
    pub readme: PathBuf,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: DiffArgs) -> Result<Outcome> {
    let (spec, rules) = args.inputs.load()?;
    let metadata = args.inputs.repo_metadata(&spec);

    let text = storage::read(&args.readme)?;
    let actual = Document::parse(&text);
    let expected = SectionRenderer::new().render(&spec, &rules, &metadata)?;

    let report = SemanticDiffer::diff(&actual, &expected);
    info!("{} section(s) compared", report.changes.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_clean() {
        println!(
            "No drift: {} matches a fresh render",
            args.readme.display()
        );
    } else {
        println!("Semantic drift against a fresh render:");
        for change in report.drifted() {
            println!("- {}: {}", kind_label(change.kind), change.id);
            if change.kind == ChangeKind::Modified {
                if let Some(before) = &change.before {
                    print_block("before", before);
                }
                if let Some(after) = &change.after {
                    print_block("after", after);
                }
            }
        }
    }

    Ok(if report.is_clean() {
        Outcome::Clean
    } else {
        Outcome::ReportedFailure
    })
}

fn kind_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "added",
        ChangeKind::Removed => "removed",
        ChangeKind::Modified => "modified",
        ChangeKind::Moved => "moved",
        ChangeKind::Unchanged => "unchanged",
    }
}

fn print_block(label: &str, body: &str) {
    println!("    {label}:");
    for line in body.lines() {
        println!("      {line}");
    }
}
