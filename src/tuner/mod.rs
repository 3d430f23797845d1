//! Search driver
//!
//! [`Tuner`] runs the trial loop over whatever search space the hypermodel
//! declares:
//!
//! ```text
//! Tuner
//!   ├── Oracle (RandomSearch by default) suggests an assignment
//!   ├── per trial: build → compile overrides → fit × executions_per_trial
//!   └── ProjectStore persists every trial under directory/project_name
//! ```

mod config;
mod storage;
mod summary;

pub use config::TunerConfig;
pub use storage::{ProjectStore, TunerState};
pub use summary::{ResultsSummary, SearchSpaceSummary};

use chrono::Utc;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use std::path::Path;

use crate::error::{Error, Result};
use crate::hpo::{
    infer_direction, trial_id, Assignment, Direction, HyperParameters, Objective, Oracle,
    RandomSearch, SearchSpace, Trial, ValueSource,
};
use crate::model::{FitOptions, History, HyperModel, Trainable};

/// Drives a hyperparameter search for hypermodel `H` on data of type `D`.
pub struct Tuner<H, D> {
    hypermodel: H,
    config: TunerConfig,
    objective: Objective,
    store: ProjectStore,
    space: SearchSpace,
    overrides: BTreeSet<String>,
    trials: Vec<Trial>,
    oracle: Box<dyn Oracle>,
    seed: u64,
    _data: PhantomData<fn(&D)>,
}

impl<H, D> Tuner<H, D>
where
    H: HyperModel<D>,
{
    /// Validate the config and prepare the project directory.
    ///
    /// Unless `overwrite` is set, finished trials from a previous run of the
    /// same project are reloaded and count toward `max_trials`.
    pub fn new(hypermodel: H, config: TunerConfig) -> Result<Self> {
        config.validate()?;
        let objective = config.objective.resolve()?;
        let store = ProjectStore::new(&config.directory, &config.project_name);
        store.prepare(config.overwrite)?;

        let mut space = config.hyperparameters.clone().unwrap_or_default();
        let mut overrides: BTreeSet<String> =
            space.names().into_iter().map(str::to_string).collect();
        let mut trials = Vec::new();

        if let Some(state) = store.load_state()? {
            if state.objective != objective {
                return Err(Error::ConfigError(format!(
                    "project {} was tuned for {}, not {}; set overwrite to start over",
                    store.root().display(),
                    state.objective,
                    objective
                )));
            }
            space.merge(&state.search_space);
            overrides.extend(state.overrides.iter().cloned());
            trials = store.load_trials(&state)?;
            tracing::info!(
                project = %store.root().display(),
                trials = trials.len(),
                "reloaded previous search"
            );
        }

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut oracle: Box<dyn Oracle> = Box::new(RandomSearch::new(seed));
        for trial in &trials {
            oracle.record(trial);
        }

        Ok(Self {
            hypermodel,
            config,
            objective,
            store,
            space,
            overrides,
            trials,
            oracle,
            seed,
            _data: PhantomData,
        })
    }

    /// Replace the candidate generator. Reloaded trials are recorded with it.
    pub fn with_oracle(mut self, oracle: impl Oracle + 'static) -> Self {
        self.oracle = Box::new(oracle);
        for trial in &self.trials {
            self.oracle.record(trial);
        }
        self
    }

    /// Run trials until `max_trials` exist, the oracle runs dry, or the
    /// search aborts.
    pub fn search(&mut self, train: &D, validation: Option<&D>, options: &FitOptions) -> Result<()> {
        self.discover_space()?;
        tracing::info!(
            oracle = self.oracle.name(),
            objective = %self.objective,
            space = self.space.len(),
            max_trials = self.config.max_trials,
            "starting search"
        );

        let mut consecutive_failures = 0;
        while self.trials.len() < self.config.max_trials {
            let index = self.trials.len();
            let Some(suggestion) = self.oracle.suggest(&self.space)? else {
                tracing::info!("search space exhausted");
                break;
            };

            let mut trial = Trial::new(trial_id(index, self.config.max_trials), suggestion);
            self.store.save_trial(&trial)?;
            tracing::info!(trial = %trial.id, "starting trial");

            match self.run_trial(&mut trial, index, train, validation, options) {
                Ok(()) => {
                    consecutive_failures = 0;
                    tracing::info!(trial = %trial.id, score = ?trial.score, "trial completed");
                }
                Err(e) if e.is_fatal() => {
                    self.save_state()?;
                    return Err(e);
                }
                Err(e) => {
                    consecutive_failures += 1;
                    tracing::warn!(trial = %trial.id, error = %e, "trial failed");
                    trial.fail(e.to_string());
                }
            }

            self.oracle.record(&trial);
            self.store.save_trial(&trial)?;
            self.trials.push(trial);
            self.save_state()?;

            if consecutive_failures >= self.config.max_consecutive_failed_trials {
                return Err(Error::TooManyFailures(consecutive_failures));
            }
        }

        tracing::info!(
            trials = self.trials.len(),
            best = ?self.objective.rank(&self.trials).first().and_then(|t| t.score),
            "search finished"
        );
        Ok(())
    }

    /// Build once with default values to learn the initial search space.
    fn discover_space(&mut self) -> Result<()> {
        let mut hp = self.handle(Assignment::new(), ValueSource::Default);
        self.hypermodel.build(&mut hp)?;
        self.absorb(hp);
        self.save_state()
    }

    fn run_trial(
        &mut self,
        trial: &mut Trial,
        index: usize,
        train: &D,
        validation: Option<&D>,
        options: &FitOptions,
    ) -> Result<()> {
        let executions = self.config.executions_per_trial;
        let mut scores = Vec::with_capacity(executions);
        let mut metric_sums: BTreeMap<String, f64> = BTreeMap::new();
        let mut values = trial.hyperparameters.clone();

        for execution in 0..executions {
            let mut hp = HyperParameters::for_trial(
                self.space.clone(),
                values.clone(),
                self.overrides.clone(),
                self.config.tune_new_entries,
                self.seed.wrapping_add(index as u64),
            );
            let mut model = self.hypermodel.build(&mut hp)?;
            if let Some(compile) = &self.config.compile {
                model.compile(compile)?;
            }
            let history = self.hypermodel.fit(&mut hp, &mut model, train, validation, options)?;

            if execution == 0 {
                values = hp.values().clone();
                trial.hyperparameters = hp.active_values();
            }
            self.absorb(hp);

            scores.push(self.best_objective(&trial.id, &history)?);
            for name in history.names() {
                if let Some(best) = best_metric(name, &history) {
                    *metric_sums.entry(name.to_string()).or_default() += best;
                }
            }
            tracing::debug!(trial = %trial.id, execution, score = scores[execution], "execution finished");
        }

        let n = executions as f64;
        let score = scores.iter().sum::<f64>() / n;
        if !score.is_finite() {
            return Err(Error::TrialFailed {
                trial_id: trial.id.clone(),
                message: format!("mean {} over {executions} executions is not finite", self.objective.name),
            });
        }
        // JSON has no encoding for infinities; such metrics are left out.
        let metrics = metric_sums
            .into_iter()
            .map(|(k, v)| (k, v / n))
            .filter(|(_, v)| v.is_finite())
            .collect();
        trial.complete(score, metrics);
        Ok(())
    }

    fn best_objective(&self, trial_id: &str, history: &History) -> Result<f64> {
        let series = history.get(&self.objective.name).ok_or_else(|| Error::MissingObjective {
            objective: self.objective.name.clone(),
            available: history.names().collect::<Vec<_>>().join(", "),
        })?;
        self.objective.best_of(series).ok_or_else(|| Error::TrialFailed {
            trial_id: trial_id.to_string(),
            message: format!("no finite value reported for {}", self.objective.name),
        })
    }

    /// Keep the names a callback declared for later trials.
    fn absorb(&mut self, hp: HyperParameters) {
        self.overrides.extend(hp.overrides().iter().cloned());
        let added = self.space.merge(hp.space());
        if added > 0 {
            tracing::debug!(added, total = self.space.len(), "search space grew");
        }
    }

    fn handle(&self, values: Assignment, source: ValueSource) -> HyperParameters {
        HyperParameters::for_trial(
            self.space.clone(),
            values,
            self.overrides.clone(),
            self.config.tune_new_entries,
            self.seed,
        )
        .with_source(source)
    }

    fn save_state(&self) -> Result<()> {
        self.store.save_state(&TunerState {
            objective: self.objective.clone(),
            search_space: self.space.clone(),
            overrides: self.overrides.clone(),
            max_trials: self.config.max_trials,
            trial_ids: self.trials.iter().map(|t| t.id.clone()).collect(),
            updated_at: Utc::now(),
        })
    }

    /// The `n` best completed trials, best first.
    pub fn best_trials(&self, n: usize) -> Vec<&Trial> {
        self.objective.rank(&self.trials).into_iter().take(n).collect()
    }

    /// Assignments of the `n` best trials, best first.
    pub fn get_best_hyperparameters(&self, n: usize) -> Vec<Assignment> {
        self.best_trials(n).into_iter().map(|t| t.hyperparameters.clone()).collect()
    }

    /// Rebuild the `n` best models from their assignments, with compile
    /// overrides applied. Models come back untrained.
    pub fn get_best_models(&self, n: usize) -> Result<Vec<H::Model>> {
        let best = self.get_best_hyperparameters(n);
        let mut models = Vec::with_capacity(best.len());
        for values in best {
            let mut hp = self.handle(values, ValueSource::Default);
            let mut model = self.hypermodel.build(&mut hp)?;
            if let Some(compile) = &self.config.compile {
                model.compile(compile)?;
            }
            models.push(model);
        }
        Ok(models)
    }

    pub fn results_summary(&self, num_trials: usize) -> ResultsSummary {
        ResultsSummary::new(self.store.root().to_path_buf(), &self.objective, &self.trials, num_trials)
    }

    pub fn search_space_summary(&self) -> SearchSpaceSummary {
        SearchSpaceSummary::new(&self.space)
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    pub fn project_dir(&self) -> &Path {
        self.store.root()
    }
}

/// Best value of a reported metric, in its inferred direction (min when the
/// name gives no hint).
fn best_metric(name: &str, history: &History) -> Option<f64> {
    let direction = infer_direction(name).unwrap_or(Direction::Min);
    Objective::new(name, direction).best_of(history.get(name)?)
}
