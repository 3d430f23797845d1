//! HPO error types

use thiserror::Error;

/// Hyperparameter declaration and search-space errors.
///
/// All of these are configuration mistakes in the model-building callback or
/// the tuner setup; they are raised before any value is sampled.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HPOError {
    #[error("Invalid range for {name}: min ({min}) must not exceed max ({max})")]
    InvalidRange { name: String, min: f64, max: f64 },

    #[error("Invalid step for {name}: step must be positive, got {step}")]
    InvalidStep { name: String, step: f64 },

    #[error("Invalid log bounds for {0}: log sampling requires min > 0")]
    InvalidLogBounds(String),

    #[error("Empty choice list for {0}")]
    EmptyChoices(String),

    #[error("Mixed value types in choices for {0}")]
    MixedChoiceTypes(String),

    #[error("Invalid default for {name}: {value}")]
    InvalidDefault { name: String, value: String },

    #[error("Conflicting declaration of {name}: {reason}")]
    Conflict { name: String, reason: String },

    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Invalid parameter value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Could not infer optimization direction for objective '{0}'; specify it explicitly")]
    UnknownObjectiveDirection(String),

    #[error("Unknown direction '{0}' (expected min or max)")]
    UnknownDirection(String),
}

/// Result type for HPO operations
pub type Result<T> = std::result::Result<T, HPOError>;
