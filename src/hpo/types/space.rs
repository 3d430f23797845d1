//! Hyperparameter search space

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::hpo::error::{HPOError, Result};

use super::parameter::HyperParameter;
use super::value::Assignment;

/// Hyperparameter search space
///
/// Parameters keep their declaration order, which is the order a
/// model-building callback reached them in. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchSpace {
    params: Vec<HyperParameter>,
}

impl SearchSpace {
    /// Create an empty search space
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a parameter. Returns `false` without touching the
    /// space if the name is already registered.
    pub fn register(&mut self, param: HyperParameter) -> Result<bool> {
        param.validate()?;
        if self.contains(&param.name) {
            return Ok(false);
        }
        self.params.push(param);
        Ok(true)
    }

    /// Get a parameter by name
    pub fn get(&self, name: &str) -> Option<&HyperParameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check if space is empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterate over parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &HyperParameter> {
        self.params.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Sample a random configuration
    pub fn sample_random<R: Rng>(&self, rng: &mut R) -> Assignment {
        self.params.iter().map(|p| (p.name.clone(), p.sample(rng))).collect()
    }

    /// Default value for every parameter
    pub fn defaults(&self) -> Assignment {
        self.params.iter().map(|p| (p.name.clone(), p.default_value())).collect()
    }

    /// Validate a configuration
    pub fn validate(&self, config: &Assignment) -> Result<()> {
        for param in &self.params {
            match config.get(&param.name) {
                Some(value) if param.is_valid(value) => {}
                Some(value) => {
                    return Err(HPOError::InvalidValue(param.name.clone(), value.to_string()))
                }
                None => return Err(HPOError::ParameterNotFound(param.name.clone())),
            }
        }
        Ok(())
    }

    /// Append every parameter of `other` whose name is not registered yet.
    /// Returns how many were added.
    pub fn merge(&mut self, other: &SearchSpace) -> usize {
        let before = self.params.len();
        for param in &other.params {
            if !self.contains(&param.name) {
                self.params.push(param.clone());
            }
        }
        self.params.len() - before
    }
}

impl<'a> IntoIterator for &'a SearchSpace {
    type Item = &'a HyperParameter;
    type IntoIter = std::slice::Iter<'a, HyperParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
