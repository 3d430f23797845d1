//! On-disk layout of a tuning project
//!
//! ```text
//! directory/project_name/
//!   tuner.json              objective, search space, trial ids
//!   trial_00/trial.json     one file per trial
//!   trial_01/trial.json
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::hpo::{Objective, SearchSpace, Trial, TrialStatus};

const STATE_FILE: &str = "tuner.json";
const TRIAL_FILE: &str = "trial.json";

/// Tuner-level state persisted after every trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunerState {
    pub objective: Objective,
    pub search_space: SearchSpace,
    /// Names pinned by pre-supplied entries or `tune_new_entries = false`.
    #[serde(default)]
    pub overrides: BTreeSet<String>,
    pub max_trials: usize,
    pub trial_ids: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Reads and writes one project directory.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new(directory: impl AsRef<Path>, project_name: &str) -> Self {
        Self { root: directory.as_ref().join(project_name) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.join(STATE_FILE).is_file()
    }

    /// Create the project directory, wiping a previous run when `overwrite`.
    pub fn prepare(&self, overwrite: bool) -> Result<()> {
        if overwrite && self.root.exists() {
            tracing::info!(path = %self.root.display(), "overwriting previous tuning project");
            fs::remove_dir_all(&self.root).map_err(|e| {
                Error::Io(format!("Failed to remove {}: {e}", self.root.display()))
            })?;
        }
        fs::create_dir_all(&self.root)
            .map_err(|e| Error::Io(format!("Failed to create {}: {e}", self.root.display())))
    }

    pub fn save_state(&self, state: &TunerState) -> Result<()> {
        write_json(&self.root.join(STATE_FILE), state)
    }

    /// `None` when no previous run was saved here.
    pub fn load_state(&self) -> Result<Option<TunerState>> {
        let path = self.root.join(STATE_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    pub fn trial_dir(&self, trial_id: &str) -> PathBuf {
        self.root.join(format!("trial_{trial_id}"))
    }

    pub fn save_trial(&self, trial: &Trial) -> Result<()> {
        let dir = self.trial_dir(&trial.id);
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Io(format!("Failed to create {}: {e}", dir.display())))?;
        write_json(&dir.join(TRIAL_FILE), trial)?;
        tracing::debug!(trial = %trial.id, status = %trial.status, "saved trial");
        Ok(())
    }

    /// Trials listed in the saved state, in order. Trials that were still
    /// running when the previous process stopped are dropped.
    pub fn load_trials(&self, state: &TunerState) -> Result<Vec<Trial>> {
        let mut trials = Vec::with_capacity(state.trial_ids.len());
        for id in &state.trial_ids {
            let path = self.trial_dir(id).join(TRIAL_FILE);
            if !path.is_file() {
                tracing::warn!(trial = %id, "trial listed in state but missing on disk");
                continue;
            }
            let trial: Trial = read_json(&path)?;
            if trial.status == TrialStatus::Running {
                tracing::warn!(trial = %id, "discarding unfinished trial");
                continue;
            }
            trials.push(trial);
        }
        Ok(trials)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Serialization(format!("Failed to serialize {}: {e}", path.display())))?;
    fs::write(path, json).map_err(|e| Error::Io(format!("Failed to write {}: {e}", path.display())))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| Error::Serialization(format!("Failed to parse {}: {e}", path.display())))
}
