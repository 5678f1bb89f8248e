//! # repograph CLI
//!
//! Command-line interface for Repograph.
//!
//! This binary provides human-friendly access to `repograph-core`
//! functionality. Run `repograph --help` for usage information.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
