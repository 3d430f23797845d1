//! Core HPO types

mod parameter;
mod space;
mod trial;
mod value;


// Re-export all public types
pub use parameter::{HyperParameter, ParameterDomain, Sampling};
pub use space::SearchSpace;
pub use trial::{trial_id, Trial, TrialStatus};
pub use value::{Assignment, FromParameterValue, ParameterValue};
