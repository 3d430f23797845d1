//! The hyperparameter handle passed to model-building callbacks
//!
//! Every typed call both declares a hyperparameter in the active search space
//! and returns the value the current trial uses for it.
//!
//! ```
//! use afinar::hpo::HyperParameters;
//!
//! let mut hp = HyperParameters::new();
//! let units = hp.int("units", 32, 512, 32)?;
//! let activation = hp.choice("activation", &["relu", "tanh"])?;
//! assert_eq!((units, activation), (32, "relu"));
//! assert_eq!(hp.space().len(), 2);
//! # Ok::<(), afinar::hpo::HPOError>(())
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

use super::error::{HPOError, Result};
use super::types::{
    Assignment, FromParameterValue, HyperParameter, ParameterValue, SearchSpace,
};

/// Where values for names without an assigned value come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Draw a fresh sample from the declared domain
    Sample,
    /// Use the declared default
    Default,
}

/// Hyperparameter handle.
///
/// Holds the search space being populated, the values of the current trial,
/// and the names reached so far in this invocation of the callback.
#[derive(Debug, Clone)]
pub struct HyperParameters {
    space: SearchSpace,
    values: Assignment,
    overrides: BTreeSet<String>,
    reached: Vec<String>,
    source: ValueSource,
    tune_new_entries: bool,
    rng: StdRng,
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperParameters {
    /// Empty handle that answers every declaration with its default.
    pub fn new() -> Self {
        Self {
            space: SearchSpace::new(),
            values: Assignment::new(),
            overrides: BTreeSet::new(),
            reached: Vec::new(),
            source: ValueSource::Default,
            tune_new_entries: true,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Handle that replays a fixed assignment. Names missing from it get
    /// their defaults.
    pub fn from_values(values: Assignment) -> Self {
        Self { values, ..Self::new() }
    }

    /// Handle for one tuner trial.
    ///
    /// `space` is everything declared so far, `values` the oracle's
    /// suggestion, and `overrides` the names that were pre-supplied by the
    /// user and therefore win over any declaration.
    pub fn for_trial(
        space: SearchSpace,
        values: Assignment,
        overrides: BTreeSet<String>,
        tune_new_entries: bool,
        seed: u64,
    ) -> Self {
        Self {
            space,
            values,
            overrides,
            reached: Vec::new(),
            source: ValueSource::Sample,
            tune_new_entries,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Switch between sampling and defaulting unassigned names.
    pub fn with_source(mut self, source: ValueSource) -> Self {
        self.source = source;
        self
    }

    /// Integer in `[min, max]` on a `step` grid.
    pub fn int(&mut self, name: &str, min: i64, max: i64, step: i64) -> Result<i64> {
        let param = HyperParameter::int(name, min, max).with_step(step as f64);
        let value = self.declare(param)?;
        convert(name, &value)
    }

    /// Float in `[min, max]`.
    pub fn float(&mut self, name: &str, min: f64, max: f64) -> Result<f64> {
        let value = self.declare(HyperParameter::float(name, min, max))?;
        convert(name, &value)
    }

    pub fn boolean(&mut self, name: &str) -> Result<bool> {
        let value = self.declare(HyperParameter::boolean(name))?;
        convert(name, &value)
    }

    /// One of `values`; returns the matching element itself.
    pub fn choice<T>(&mut self, name: &str, values: &[T]) -> Result<T>
    where
        T: Clone + Into<ParameterValue>,
    {
        let declared = HyperParameter::choice(name, values.iter().cloned());
        let value = self.declare(declared)?;
        pick(name, values, &value)
    }

    /// A value that is never tuned.
    pub fn fixed<T>(&mut self, name: &str, value: T) -> Result<T>
    where
        T: Clone + Into<ParameterValue>,
    {
        let resolved = self.declare(HyperParameter::fixed(name, value.clone()))?;
        pick(name, std::slice::from_ref(&value), &resolved)
    }

    /// Declare a fully specified hyperparameter (custom default, sampling,
    /// step or ordering) and return its raw value.
    pub fn declare(&mut self, param: HyperParameter) -> Result<ParameterValue> {
        param.validate()?;
        let name = param.name.clone();

        match self.space.get(&name) {
            Some(_) if self.overrides.contains(&name) => {}
            Some(existing) if *existing == param => {}
            Some(existing) => {
                return Err(HPOError::Conflict {
                    name,
                    reason: format!(
                        "already declared as {} ({}), redeclared as {} ({})",
                        existing.kind_name(),
                        existing.domain,
                        param.kind_name(),
                        param.domain
                    ),
                });
            }
            None if self.tune_new_entries => {
                self.space.register(param)?;
            }
            None => {
                let fixed = HyperParameter::fixed(&name, param.default_value());
                self.space.register(fixed)?;
                self.overrides.insert(name.clone());
            }
        }

        let value = self.resolve(&name)?;
        if !self.reached.contains(&name) {
            self.reached.push(name);
        }
        Ok(value)
    }

    fn resolve(&mut self, name: &str) -> Result<ParameterValue> {
        let param = self
            .space
            .get(name)
            .ok_or_else(|| HPOError::ParameterNotFound(name.to_string()))?;

        if let Some(value) = self.values.get(name) {
            if param.is_valid(value) {
                return Ok(value.clone());
            }
            return Err(HPOError::InvalidValue(name.to_string(), value.to_string()));
        }

        let value = match self.source {
            ValueSource::Sample => param.sample(&mut self.rng),
            ValueSource::Default => param.default_value(),
        };
        tracing::debug!(hyperparameter = name, value = %value, "assigned hyperparameter");
        self.values.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Value of an already declared hyperparameter.
    pub fn get<T: FromParameterValue>(&self, name: &str) -> Result<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| HPOError::ParameterNotFound(name.to_string()))?;
        convert(name, value)
    }

    /// The search space declared so far.
    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    /// Every value known to this handle, including suggested values for
    /// names the callback has not reached.
    pub fn values(&self) -> &Assignment {
        &self.values
    }

    /// Names declared during this invocation, in the order they were reached.
    pub fn reached(&self) -> &[String] {
        &self.reached
    }

    /// Values restricted to the names reached during this invocation.
    pub fn active_values(&self) -> Assignment {
        self.reached
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name.clone(), v.clone())))
            .collect()
    }

    /// Names whose entry wins over any declaration: pre-supplied entries and
    /// new names pinned to their default because new entries are not tuned.
    pub fn overrides(&self) -> &BTreeSet<String> {
        &self.overrides
    }

    pub fn into_space(self) -> SearchSpace {
        self.space
    }
}

fn convert<T: FromParameterValue>(name: &str, value: &ParameterValue) -> Result<T> {
    T::from_value(value).ok_or_else(|| {
        HPOError::InvalidValue(name.to_string(), format!("{value} has kind {}", value.kind()))
    })
}

fn pick<T>(name: &str, candidates: &[T], value: &ParameterValue) -> Result<T>
where
    T: Clone + Into<ParameterValue>,
{
    candidates
        .iter()
        .find(|c| Into::<ParameterValue>::into((*c).clone()) == *value)
        .cloned()
        .ok_or_else(|| HPOError::InvalidValue(name.to_string(), value.to_string()))
}
