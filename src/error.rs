//! Crate-level error type

use thiserror::Error;

use crate::hpo::HPOError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Hyperparameter error: {0}")]
    Hyperparameter(#[from] HPOError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Objective '{objective}' not found in training history (available: {available})")]
    MissingObjective { objective: String, available: String },

    #[error("Trial {trial_id} failed: {message}")]
    TrialFailed { trial_id: String, message: String },

    #[error("Search aborted after {0} consecutive failed trials")]
    TooManyFailures(usize),

    #[error("Dataset error: {0}")]
    Dataset(String),
}

impl Error {
    /// Errors that stop a search outright instead of failing a single trial.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Hyperparameter(_) | Error::ConfigError(_) | Error::MissingObjective { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
