//! CLI module for afinar
//!
//! Inspects tuning projects written by [`crate::tuner::Tuner`] and validates
//! tuner configuration files.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{init_tracing, LogLevel};

use afinar_common::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Afinar: hyperparameter tuning harness
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "afinar")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Inspect hyperparameter tuning projects and validate tuner configs")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the best trials of a project
    Summary(SummaryArgs),

    /// Show the search space a project explored
    Space(ProjectArgs),

    /// Print the best hyperparameter assignments
    Best(SummaryArgs),

    /// Validate a tuner configuration file
    Validate(ValidateArgs),
}

/// Location of a tuning project and how to print it
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ProjectArgs {
    /// Directory holding tuning projects
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Project name
    #[arg(short, long, default_value = "untitled_project")]
    pub project: String,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Number of trials to show
    #[arg(short, long, default_value = "10")]
    pub num_trials: usize,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML tuner configuration
    pub config: PathBuf,
}
