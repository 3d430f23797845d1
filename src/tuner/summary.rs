//! Text reports over a search

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::hpo::{HyperParameter, Objective, SearchSpace, Trial};

/// The best trials of a search, best first.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsSummary {
    pub project_dir: PathBuf,
    pub objective: Objective,
    pub trials: Vec<Trial>,
}

impl ResultsSummary {
    /// Rank `trials` by `objective` and keep the best `num_trials`.
    pub fn new(project_dir: PathBuf, objective: &Objective, trials: &[Trial], num_trials: usize) -> Self {
        let trials = objective.rank(trials).into_iter().take(num_trials).cloned().collect();
        Self { project_dir, objective: objective.clone(), trials }
    }
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results summary")?;
        writeln!(f, "Results in {}", self.project_dir.display())?;
        writeln!(f, "Showing {} best trials", self.trials.len())?;
        writeln!(f, "{}", self.objective)?;
        for trial in &self.trials {
            writeln!(f)?;
            writeln!(f, "Trial {} summary", trial.id)?;
            writeln!(f, "Hyperparameters:")?;
            for (name, value) in &trial.hyperparameters {
                writeln!(f, "{name}: {value}")?;
            }
            match trial.score {
                Some(score) => writeln!(f, "Score: {score}")?,
                None => writeln!(f, "Score: none")?,
            }
        }
        Ok(())
    }
}

/// Every declared hyperparameter with its domain.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSpaceSummary {
    pub params: Vec<HyperParameter>,
}

impl SearchSpaceSummary {
    pub fn new(space: &SearchSpace) -> Self {
        Self { params: space.iter().cloned().collect() }
    }
}

impl fmt::Display for SearchSpaceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search space summary")?;
        writeln!(f, "Default search space size: {}", self.params.len())?;
        for param in &self.params {
            writeln!(f, "{} ({})", param.name, param.kind_name())?;
            writeln!(f, "{{{}, default: {}}}", param.domain, param.default_value())?;
        }
        Ok(())
    }
}
