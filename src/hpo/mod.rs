//! Hyperparameter declaration and search-space bookkeeping
//!
//! A model-building callback receives a [`HyperParameters`] handle. Each typed
//! call on it registers the hyperparameter in the active [`SearchSpace`] (the
//! space grows lazily, so branches that never run declare nothing) and returns
//! the value for the current [`Trial`].
//!
//! # Example
//!
//! ```
//! use afinar::hpo::{HyperParameters, Objective};
//!
//! let mut hp = HyperParameters::new();
//! let num_layers = hp.int("num_layers", 1, 3, 1)?;
//! for i in 0..num_layers {
//!     hp.int(&format!("units_{i}"), 32, 512, 32)?;
//! }
//! assert_eq!(hp.space().len(), 1 + num_layers as usize);
//!
//! let objective = Objective::infer("val_accuracy")?;
//! assert_eq!(objective.to_string(), "Objective(name=\"val_accuracy\", direction=\"max\")");
//! # Ok::<(), afinar::hpo::HPOError>(())
//! ```

mod error;
mod handle;
mod objective;
mod oracle;
mod types;

pub use error::{HPOError, Result};
pub use handle::{HyperParameters, ValueSource};
pub use objective::{infer_direction, Direction, Objective, ObjectiveSpec};
pub use oracle::{assignment_hash, Oracle, RandomSearch};
pub use types::{
    trial_id, Assignment, FromParameterValue, HyperParameter, ParameterDomain, ParameterValue,
    Sampling, SearchSpace, Trial, TrialStatus,
};
