//! Candidate generation for the tuner
//!
//! The tuner asks an [`Oracle`] for the next assignment to try and reports
//! every finished trial back to it. Only plain random sampling ships with the
//! crate; smarter strategies plug in behind the same trait.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use super::error::Result;
use super::types::{Assignment, SearchSpace, Trial};

/// Source of hyperparameter assignments.
pub trait Oracle {
    /// Suggest values for the current search space. `None` means no new
    /// candidate can be produced and the search should stop.
    fn suggest(&mut self, space: &SearchSpace) -> Result<Option<Assignment>>;

    /// Record a finished (completed or failed) trial.
    fn record(&mut self, trial: &Trial);

    fn name(&self) -> &str;
}

/// Uniform random sampling with duplicate rejection.
///
/// A candidate is a duplicate when its full sample was handed out before, or
/// when it agrees with a finished trial on every name that trial reached. The
/// model-building callback is deterministic, so such a candidate would follow
/// the same path and rebuild the same model.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    rng: StdRng,
    seen: HashSet<String>,
    finished: Vec<Assignment>,
    max_collisions: usize,
}

impl RandomSearch {
    /// Default number of consecutive duplicate draws before giving up.
    pub const DEFAULT_MAX_COLLISIONS: usize = 20;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seen: HashSet::new(),
            finished: Vec::new(),
            max_collisions: Self::DEFAULT_MAX_COLLISIONS,
        }
    }

    pub fn with_max_collisions(mut self, max_collisions: usize) -> Self {
        self.max_collisions = max_collisions.max(1);
        self
    }

    /// Number of distinct assignments handed out or recorded.
    pub fn n_seen(&self) -> usize {
        self.seen.len()
    }

    fn repeats_finished_trial(&self, candidate: &Assignment) -> bool {
        self.finished
            .iter()
            .any(|reached| reached.iter().all(|(name, value)| candidate.get(name) == Some(value)))
    }
}

/// SHA-256 over the canonical (name-sorted) JSON of an assignment.
pub fn assignment_hash(values: &Assignment) -> String {
    let canonical = serde_json::to_string(values).unwrap_or_default();
    format!("{:x}", Sha256::digest(canonical.as_bytes()))
}

impl Oracle for RandomSearch {
    fn suggest(&mut self, space: &SearchSpace) -> Result<Option<Assignment>> {
        for _ in 0..self.max_collisions {
            let values = space.sample_random(&mut self.rng);
            if self.seen.insert(assignment_hash(&values)) && !self.repeats_finished_trial(&values) {
                return Ok(Some(values));
            }
        }
        tracing::debug!(
            max_collisions = self.max_collisions,
            "random search found no unseen assignment"
        );
        Ok(None)
    }

    fn record(&mut self, trial: &Trial) {
        self.seen.insert(assignment_hash(&trial.hyperparameters));
        if !self.finished.contains(&trial.hyperparameters) {
            self.finished.push(trial.hyperparameters.clone());
        }
    }

    fn name(&self) -> &str {
        "random_search"
    }
}
