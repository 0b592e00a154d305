//! readmekit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success / empty report
//! - 1: Validation failure or drift detected
//! - 2: Fatal error (schema, rule tables, rendering, storage)

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod storage;

use commands::{Cli, Commands, Outcome};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const REPORT_FAILURE: u8 = 1;
    pub const FATAL: u8 = 2;
}

fn main() -> ExitCode {
    // A second init attempt (e.g. under test harnesses) is harmless.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive("readmekit=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
    };

    match result {
        Ok(Outcome::Clean) => ExitCode::from(ExitCodes::SUCCESS),
        Ok(Outcome::ReportedFailure) => ExitCode::from(ExitCodes::REPORT_FAILURE),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(ExitCodes::FATAL)
        }
    }
}
