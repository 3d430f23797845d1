//! Validate command implementation

use afinar_common::{AfinarError, Result};
use std::path::Path;

use crate::cli::logging::log;
use crate::cli::{LogLevel, ValidateArgs};
use crate::error::Error;
use crate::tuner::TunerConfig;

pub fn run_validate(args: &ValidateArgs, level: LogLevel) -> Result<()> {
    let config = load_validated(&args.config)?;
    log(level, LogLevel::Normal, &format!("Configuration valid: {}", args.config.display()));
    log(level, LogLevel::Verbose, &format_config(&config));
    Ok(())
}

pub(super) fn load_validated(path: &Path) -> Result<TunerConfig> {
    if !path.is_file() {
        return Err(AfinarError::ConfigNotFound { path: path.to_path_buf() });
    }
    TunerConfig::from_yaml_file(path).map_err(|e| match e {
        Error::ConfigError(message) if message.starts_with("Failed to parse") => {
            AfinarError::ConfigParsing { path: path.to_path_buf(), message }
        }
        Error::ConfigError(message) => AfinarError::ConfigValue {
            field: field_of(&message).to_string(),
            message,
            suggestion: "Use a positive count and a plain project name".to_string(),
        },
        Error::Hyperparameter(err) => AfinarError::ConfigValue {
            field: "objective/hyperparameters".to_string(),
            message: err.to_string(),
            suggestion: "Name a known metric or give {name, direction}; check entry ranges".to_string(),
        },
        Error::Io(message) => AfinarError::io(
            format!("reading {}", path.display()),
            std::io::Error::other(message),
        ),
        other => AfinarError::Internal { message: other.to_string() },
    })
}

fn field_of(message: &str) -> &str {
    message.split_whitespace().next().unwrap_or("config")
}

/// Format configuration fields as a string
pub fn format_config(config: &TunerConfig) -> String {
    let mut lines = vec![
        format!("  Objective: {:?}", config.objective),
        format!("  Max trials: {}", config.max_trials),
        format!("  Executions per trial: {}", config.executions_per_trial),
        format!("  Project: {}", config.project_dir().display()),
        format!("  Overwrite: {}", config.overwrite),
        format!("  Tune new entries: {}", config.tune_new_entries),
    ];
    if let Some(space) = &config.hyperparameters {
        lines.push(format!("  Pre-supplied entries: {}", space.names().join(", ")));
    }
    if let Some(seed) = config.seed {
        lines.push(format!("  Seed: {seed}"));
    }
    lines.join("\n")
}
