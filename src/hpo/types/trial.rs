//! Trial types for HPO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value::Assignment;

/// A single trial: one assignment of hyperparameter values and its outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Trial ID (zero-padded index, e.g. `"07"`)
    pub id: String,
    /// Values for the hyperparameters the model-building callback reached
    pub hyperparameters: Assignment,
    /// Best value per reported metric, averaged over executions
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    /// Objective score
    #[serde(default)]
    pub score: Option<f64>,
    /// Trial status
    pub status: TrialStatus,
    /// Failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Trial {
    /// Create a new running trial
    pub fn new(id: impl Into<String>, hyperparameters: Assignment) -> Self {
        Self {
            id: id.into(),
            hyperparameters,
            metrics: BTreeMap::new(),
            score: None,
            status: TrialStatus::Running,
            message: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Mark trial as complete with score
    pub fn complete(&mut self, score: f64, metrics: BTreeMap<String, f64>) {
        self.score = Some(score);
        self.metrics = metrics;
        self.status = TrialStatus::Completed;
        self.finished_at = Some(Utc::now());
    }

    /// Mark trial as failed
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = TrialStatus::Failed;
        self.message = Some(message.into());
        self.finished_at = Some(Utc::now());
    }

    pub fn is_completed(&self) -> bool {
        self.status == TrialStatus::Completed
    }
}

/// Trial status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrialStatus::Running => write!(f, "running"),
            TrialStatus::Completed => write!(f, "completed"),
            TrialStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Zero-padded trial id, padded to the number of digits in `max_trials`.
pub fn trial_id(index: usize, max_trials: usize) -> String {
    let width = max_trials.max(index + 1).to_string().len();
    format!("{index:0width$}")
}
