//! Tuner configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::hpo::{ObjectiveSpec, SearchSpace};
use crate::model::CompileOptions;

/// Tuning run configuration.
///
/// Every field has a default, so a YAML file only needs the fields it changes:
///
/// ```yaml
/// objective: val_accuracy
/// max_trials: 5
/// executions_per_trial: 2
/// directory: my_dir
/// project_name: helloworld
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    /// Metric to optimize, bare (`val_accuracy`) or `{name, direction}`.
    pub objective: ObjectiveSpec,
    /// Total number of trials, including ones reloaded from a previous run.
    pub max_trials: usize,
    /// Independent fits per trial; the trial score is their mean.
    pub executions_per_trial: usize,
    /// Discard a previous run in the same project directory.
    pub overwrite: bool,
    pub directory: PathBuf,
    pub project_name: String,
    /// Pre-supplied entries. They win over anything the callback declares.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperparameters: Option<SearchSpace>,
    /// Whether names first declared by the callback are tuned or pinned to
    /// their default.
    pub tune_new_entries: bool,
    /// Compile overrides applied to every built model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile: Option<CompileOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub max_consecutive_failed_trials: usize,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            objective: ObjectiveSpec::default(),
            max_trials: 10,
            executions_per_trial: 1,
            overwrite: false,
            directory: PathBuf::from("."),
            project_name: "untitled_project".to_string(),
            hyperparameters: None,
            tune_new_entries: true,
            compile: None,
            seed: None,
            max_consecutive_failed_trials: 3,
        }
    }
}

impl TunerConfig {
    pub fn new(objective: impl Into<ObjectiveSpec>) -> Self {
        Self { objective: objective.into(), ..Self::default() }
    }

    pub fn with_max_trials(mut self, max_trials: usize) -> Self {
        self.max_trials = max_trials;
        self
    }

    pub fn with_executions_per_trial(mut self, executions: usize) -> Self {
        self.executions_per_trial = executions;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_project(mut self, directory: impl Into<PathBuf>, project_name: &str) -> Self {
        self.directory = directory.into();
        self.project_name = project_name.to_string();
        self
    }

    pub fn with_hyperparameters(mut self, space: SearchSpace) -> Self {
        self.hyperparameters = Some(space);
        self
    }

    pub fn with_tune_new_entries(mut self, tune: bool) -> Self {
        self.tune_new_entries = tune;
        self
    }

    pub fn with_compile(mut self, options: CompileOptions) -> Self {
        self.compile = Some(options);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_consecutive_failed_trials(mut self, max: usize) -> Self {
        self.max_consecutive_failed_trials = max;
        self
    }

    /// `directory/project_name`
    pub fn project_dir(&self) -> PathBuf {
        self.directory.join(&self.project_name)
    }

    /// Check counts, names, objective and pre-supplied entries.
    pub fn validate(&self) -> Result<()> {
        if self.max_trials == 0 {
            return Err(Error::ConfigError("max_trials must be > 0".to_string()));
        }
        if self.executions_per_trial == 0 {
            return Err(Error::ConfigError("executions_per_trial must be > 0".to_string()));
        }
        if self.max_consecutive_failed_trials == 0 {
            return Err(Error::ConfigError(
                "max_consecutive_failed_trials must be > 0".to_string(),
            ));
        }
        if self.project_name.trim().is_empty() {
            return Err(Error::ConfigError("project_name must not be empty".to_string()));
        }
        if self.project_name.contains(['/', '\\']) {
            return Err(Error::ConfigError(format!(
                "project_name must be a single path component, got '{}'",
                self.project_name
            )));
        }
        self.objective.resolve()?;
        if let Some(space) = &self.hyperparameters {
            for param in space {
                param.validate()?;
            }
        }
        Ok(())
    }

    /// Load and validate a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("Failed to read {}: {e}", path.display())))?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), "loaded tuner config");
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hpo::{Direction, HyperParameter};

    #[test]
    fn test_defaults() {
        let config = TunerConfig::default();
        assert_eq!(config.max_trials, 10);
        assert_eq!(config.executions_per_trial, 1);
        assert!(!config.overwrite);
        assert!(config.tune_new_entries);
        assert_eq!(config.project_dir(), PathBuf::from("./untitled_project"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_config() {
        let yaml = "objective: val_accuracy\nmax_trials: 5\nexecutions_per_trial: 2\ndirectory: my_dir\nproject_name: helloworld\n";
        let config = TunerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.objective.resolve().unwrap().direction, Direction::Max);
        assert_eq!(config.max_trials, 5);
        assert_eq!(config.executions_per_trial, 2);
        assert_eq!(config.project_dir(), PathBuf::from("my_dir/helloworld"));
        assert_eq!(config.max_consecutive_failed_trials, 3);
    }

    #[test]
    fn test_yaml_explicit_objective_and_space() {
        let yaml = r"
objective:
  name: custom_score
  direction: max
hyperparameters:
  - name: learning_rate
    domain:
      kind: choice
      values: [0.01, 0.001]
      ordered: false
compile:
  loss: mse
";
        let config = TunerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.objective.resolve().unwrap().name, "custom_score");
        let space = config.hyperparameters.unwrap();
        assert_eq!(space.get("learning_rate").unwrap().kind_name(), "Choice");
        assert_eq!(config.compile.unwrap().loss.as_deref(), Some("mse"));
    }

    #[test]
    fn test_zero_counts_rejected() {
        assert!(matches!(
            TunerConfig::default().with_max_trials(0).validate(),
            Err(Error::ConfigError(_))
        ));
        assert!(TunerConfig::default().with_executions_per_trial(0).validate().is_err());
        assert!(TunerConfig::default().with_max_consecutive_failed_trials(0).validate().is_err());
    }

    #[test]
    fn test_bad_project_name_rejected() {
        assert!(TunerConfig::default().with_project("dir", "").validate().is_err());
        assert!(TunerConfig::default().with_project("dir", "a/b").validate().is_err());
    }

    #[test]
    fn test_unknown_objective_rejected() {
        let err = TunerConfig::new("throughput").validate().unwrap_err();
        assert!(matches!(err, Error::Hyperparameter(_)));
    }

    #[test]
    fn test_invalid_presupplied_entry_rejected() {
        let mut space = SearchSpace::new();
        space.register(HyperParameter::int("units", 1, 10)).unwrap();
        let mut config = TunerConfig::default().with_hyperparameters(space);
        // bypass register() validation through serde
        config.hyperparameters =
            Some(serde_json::from_str(r#"[{"name":"units","domain":{"kind":"int","min":10,"max":1,"step":1,"sampling":"linear"}}]"#).unwrap());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = TunerConfig::from_yaml_str("max_trials: [1, 2").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = TunerConfig::from_yaml_file("/nonexistent/tuner.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
