//! Error types with actionable diagnostics.
//!
//! Every variant carries enough context for a user to fix the problem
//! without reading the source.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for afinar CLI operations.
pub type Result<T> = std::result::Result<T, AfinarError>;

/// Errors surfaced by the afinar command line.
#[derive(Error, Debug)]
pub enum AfinarError {
    /// Tuning project directory does not exist.
    #[error("Tuning project not found: {path}\n  → Check --directory and --project, or run a search first")]
    ProjectNotFound { path: PathBuf },

    /// Configuration file not found at expected path.
    #[error("Configuration file not found: {path}\n  → Create a tuner config or pass a different path")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file has invalid syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// Configuration value is invalid.
    #[error("Invalid configuration value for '{field}': {message}\n  → {suggestion}")]
    ConfigValue { field: String, message: String, suggestion: String },

    /// Persisted tuner state could not be understood.
    #[error("Corrupt tuner state in {path}: {message}\n  → Re-run the search with overwrite enabled")]
    CorruptState { path: PathBuf, message: String },

    /// The project has no completed trials to report on.
    #[error("No completed trials in project '{project}'\n  → Wait for the search to finish at least one trial")]
    NoCompletedTrials { project: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic error for unexpected conditions.
    #[error("Internal error: {message}\n  → Please report this bug at https://github.com/paiml/afinar/issues")]
    Internal { message: String },
}

impl AfinarError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Check if this error is user-recoverable.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigParsing { .. }
                | Self::ConfigValue { .. }
                | Self::NoCompletedTrials { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound { .. } => "E001",
            Self::ConfigNotFound { .. } => "E002",
            Self::ConfigParsing { .. } => "E003",
            Self::ConfigValue { .. } => "E004",
            Self::CorruptState { .. } => "E010",
            Self::NoCompletedTrials { .. } => "E020",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
            Self::Internal { .. } => "E999",
        }
    }
}

impl From<serde_json::Error> for AfinarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization { message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors = vec![
            AfinarError::ProjectNotFound { path: "".into() },
            AfinarError::ConfigNotFound { path: "".into() },
            AfinarError::ConfigParsing { path: "".into(), message: "".into() },
            AfinarError::ConfigValue {
                field: "".into(),
                message: "".into(),
                suggestion: "".into(),
            },
            AfinarError::CorruptState { path: "".into(), message: "".into() },
            AfinarError::NoCompletedTrials { project: "".into() },
            AfinarError::io("", std::io::Error::other("x")),
            AfinarError::Serialization { message: "".into() },
            AfinarError::Internal { message: "".into() },
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
        assert!(codes.iter().all(|c| c.starts_with('E')));
    }

    #[test]
    fn test_user_errors_are_recoverable() {
        assert!(AfinarError::ProjectNotFound { path: "".into() }.is_user_error());
        assert!(AfinarError::NoCompletedTrials { project: "p".into() }.is_user_error());
        assert!(!AfinarError::Internal { message: "".into() }.is_user_error());
        assert!(!AfinarError::CorruptState { path: "".into(), message: "".into() }.is_user_error());
    }

    #[test]
    fn test_io_error_constructor() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AfinarError::io("reading tuner.json", io_err);

        assert!(matches!(err, AfinarError::Io { .. }));
        assert!(err.to_string().contains("reading tuner.json"));
    }

    #[test]
    fn test_config_value_error_includes_suggestion() {
        let err = AfinarError::ConfigValue {
            field: "max_trials".into(),
            message: "must be at least 1".into(),
            suggestion: "Use a value like 10".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("max_trials"));
        assert!(msg.contains("must be at least 1"));
        assert!(msg.contains("Use a value like 10"));
    }

    #[test]
    fn test_serde_json_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: AfinarError = parse.unwrap_err().into();
        assert_eq!(err.code(), "E051");
    }

    #[test]
    fn test_internal_error_mentions_bug_report() {
        let err = AfinarError::Internal { message: "unexpected state".into() };
        let msg = err.to_string();
        assert!(msg.contains("github.com"));
        assert!(msg.contains("issues"));
    }
}
