//! # Starlist CLI
//!
//! This is the binary entry point for the `starlist` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging.
//! - Running one pipeline pass and mapping its outcome to an exit status.
//!
//! The pipeline itself lives in the library crate; this binary is a thin
//! wrapper around it.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use log::error;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli.init_logging();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}
