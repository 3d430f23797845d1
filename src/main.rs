//! Afinar CLI
//!
//! Inspect tuning projects written by the library.
//!
//! # Usage
//!
//! ```bash
//! # Best trials of a project
//! afinar summary --directory my_dir --project helloworld
//!
//! # Declared search space as a table
//! afinar space -d my_dir -p helloworld --format table
//!
//! # Best assignments as JSON
//! afinar best -d my_dir -p helloworld -n 3 --format json
//!
//! # Validate a tuner config
//! afinar validate tuner.yaml
//! ```

use afinar::cli::{init_tracing, run_command, Cli, LogLevel};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}
