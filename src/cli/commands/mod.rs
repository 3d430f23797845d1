//! CLI command implementations

mod best;
mod space;
mod summary;
mod validate;


use afinar_common::{AfinarError, Result};

use crate::cli::{Cli, Command, LogLevel, ProjectArgs};
use crate::error::Error;
use crate::hpo::Trial;
use crate::tuner::{ProjectStore, TunerState};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Summary(args) => summary::run_summary(&args, log_level),
        Command::Space(args) => space::run_space(&args, log_level),
        Command::Best(args) => best::run_best(&args, log_level),
        Command::Validate(args) => validate::run_validate(&args, log_level),
    }
}

/// A persisted tuning project: saved state plus its finished trials.
struct Project {
    store: ProjectStore,
    state: TunerState,
    trials: Vec<Trial>,
}

fn load_project(args: &ProjectArgs) -> Result<Project> {
    let store = ProjectStore::new(&args.directory, &args.project);
    let state = store
        .load_state()
        .map_err(|e| project_error(&store, e))?
        .ok_or_else(|| AfinarError::ProjectNotFound { path: store.root().to_path_buf() })?;
    let trials = store.load_trials(&state).map_err(|e| project_error(&store, e))?;
    tracing::debug!(project = %store.root().display(), trials = trials.len(), "loaded project");
    Ok(Project { store, state, trials })
}

fn project_error(store: &ProjectStore, err: Error) -> AfinarError {
    match err {
        Error::Serialization(message) => {
            AfinarError::CorruptState { path: store.root().to_path_buf(), message }
        }
        Error::Io(message) => AfinarError::io(
            format!("reading {}", store.root().display()),
            std::io::Error::other(message),
        ),
        other => AfinarError::Internal { message: other.to_string() },
    }
}
