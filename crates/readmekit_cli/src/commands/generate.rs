//! Generate command - render the canonical README.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use readmekit_render::SectionRenderer;

use crate::commands::{InputArgs, Outcome};
use crate::storage;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Where to write the rendered document
    #[arg(long, default_value = "README.md")]
    pub output: PathBuf,

    /// Print to stdout instead of writing the output file
    #[arg(long)]
    pub stdout: bool,
}

pub fn execute(args: GenerateArgs) -> Result<Outcome> {
    let (spec, rules) = args.inputs.load()?;
    let metadata = args.inputs.repo_metadata(&spec);

    let document = SectionRenderer::new().render(&spec, &rules, &metadata)?;
    let text = document.to_markdown();

    if args.stdout {
        print!("{text}");
    } else {
        storage::write(&args.output, &text)?;
        info!(
            "Wrote {} section(s) to {}",
            document.sections.len(),
            args.output.display()
        );
    }

    Ok(Outcome::Clean)
}
