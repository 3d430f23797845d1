//! Hyperparameter declarations: domain, constraints and sampling

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hpo::error::{HPOError, Result};

use super::value::ParameterValue;

/// How a numeric range is explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Uniform over the range
    #[default]
    Linear,
    /// Uniform over the logarithm of the range (requires min > 0)
    Log,
}

impl fmt::Display for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sampling::Linear => write!(f, "linear"),
            Sampling::Log => write!(f, "log"),
        }
    }
}

/// Parameter domain (kind + constraints)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterDomain {
    /// Integer range [min, max] on a `step` grid anchored at `min`
    Int { min: i64, max: i64, step: i64, sampling: Sampling },
    /// Continuous range [min, max], optionally quantized to `step`
    Float { min: f64, max: f64, step: Option<f64>, sampling: Sampling },
    /// One of a fixed set of values of a single kind
    Choice { values: Vec<ParameterValue>, ordered: bool },
    /// true / false
    Boolean,
    /// Always the same value
    Fixed { value: ParameterValue },
}

impl ParameterDomain {
    /// Sample a random value from this domain
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParameterValue {
        match self {
            ParameterDomain::Int { min, max, step, sampling } => {
                // i128 holds any i64 span
                let (low, step) = (i128::from(*min), i128::from(*step));
                let n_points = (i128::from(*max) - low) / step + 1;
                let index = match sampling {
                    Sampling::Linear => rng.random_range(0..n_points),
                    Sampling::Log => {
                        let (log_low, log_high) = ((*min as f64).ln(), (*max as f64).ln());
                        let raw = (log_low + rng.random::<f64>() * (log_high - log_low)).exp();
                        (((raw - *min as f64) / step as f64).round() as i128).clamp(0, n_points - 1)
                    }
                };
                let value = low + index * step;
                ParameterValue::Int(i64::try_from(value).unwrap_or(*max))
            }
            ParameterDomain::Float { min, max, step, sampling } => {
                let raw = match sampling {
                    Sampling::Linear => min + rng.random::<f64>() * (max - min),
                    Sampling::Log => {
                        let (log_low, log_high) = (min.ln(), max.ln());
                        (log_low + rng.random::<f64>() * (log_high - log_low)).exp()
                    }
                };
                let value = match step {
                    Some(step) => {
                        let n_steps = ((max - min) / step).floor();
                        min + ((raw - min) / step).round().clamp(0.0, n_steps) * step
                    }
                    None => raw,
                };
                ParameterValue::Float(value.clamp(*min, *max))
            }
            ParameterDomain::Choice { values, .. } => {
                values[rng.random_range(0..values.len())].clone()
            }
            ParameterDomain::Boolean => ParameterValue::Bool(rng.random::<bool>()),
            ParameterDomain::Fixed { value } => value.clone(),
        }
    }

    /// Check if a value is valid for this domain
    pub fn is_valid(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (ParameterDomain::Int { min, max, step, .. }, ParameterValue::Int(v)) => {
                *v >= *min && *v <= *max && (i128::from(*v) - i128::from(*min)) % i128::from(*step) == 0
            }
            (ParameterDomain::Float { min, max, .. }, ParameterValue::Float(v)) => {
                *v >= *min && *v <= *max
            }
            (ParameterDomain::Choice { values, .. }, v) => values.contains(v),
            (ParameterDomain::Boolean, ParameterValue::Bool(_)) => true,
            (ParameterDomain::Fixed { value }, v) => value == v,
            _ => false,
        }
    }

    /// Short kind name: `Int`, `Float`, `Choice`, `Boolean` or `Fixed`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParameterDomain::Int { .. } => "Int",
            ParameterDomain::Float { .. } => "Float",
            ParameterDomain::Choice { .. } => "Choice",
            ParameterDomain::Boolean => "Boolean",
            ParameterDomain::Fixed { .. } => "Fixed",
        }
    }
}

impl fmt::Display for ParameterDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterDomain::Int { min, max, step, sampling } => {
                write!(f, "min_value: {min}, max_value: {max}, step: {step}, sampling: {sampling}")
            }
            ParameterDomain::Float { min, max, step, sampling } => {
                let step = step.map_or_else(|| "none".to_string(), |s| s.to_string());
                write!(f, "min_value: {min}, max_value: {max}, step: {step}, sampling: {sampling}")
            }
            ParameterDomain::Choice { values, ordered } => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "values: [{}], ordered: {ordered}", values.join(", "))
            }
            ParameterDomain::Boolean => write!(f, "values: [false, true]"),
            ParameterDomain::Fixed { value } => write!(f, "value: {value}"),
        }
    }
}

/// A named, constrained hyperparameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperParameter {
    pub name: String,
    pub domain: ParameterDomain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParameterValue>,
}

impl HyperParameter {
    /// Integer range with step 1 and linear sampling
    pub fn int(name: &str, min: i64, max: i64) -> Self {
        Self::with_domain(name, ParameterDomain::Int { min, max, step: 1, sampling: Sampling::Linear })
    }

    /// Continuous range with linear sampling
    pub fn float(name: &str, min: f64, max: f64) -> Self {
        Self::with_domain(
            name,
            ParameterDomain::Float { min, max, step: None, sampling: Sampling::Linear },
        )
    }

    /// Unordered choice among `values`
    pub fn choice<V: Into<ParameterValue>>(name: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::with_domain(name, ParameterDomain::Choice { values, ordered: false })
    }

    pub fn boolean(name: &str) -> Self {
        Self::with_domain(name, ParameterDomain::Boolean)
    }

    pub fn fixed(name: &str, value: impl Into<ParameterValue>) -> Self {
        Self::with_domain(name, ParameterDomain::Fixed { value: value.into() })
    }

    fn with_domain(name: &str, domain: ParameterDomain) -> Self {
        Self { name: name.to_string(), domain, default: None }
    }

    /// Set the grid step (Int) or quantization step (Float). Ignored for other kinds.
    pub fn with_step(mut self, new_step: f64) -> Self {
        match &mut self.domain {
            ParameterDomain::Int { step, .. } => *step = new_step as i64,
            ParameterDomain::Float { step, .. } => *step = Some(new_step),
            _ => {}
        }
        self
    }

    /// Set the sampling scale. Ignored for non-numeric kinds.
    pub fn with_sampling(mut self, new_sampling: Sampling) -> Self {
        match &mut self.domain {
            ParameterDomain::Int { sampling, .. } | ParameterDomain::Float { sampling, .. } => {
                *sampling = new_sampling;
            }
            _ => {}
        }
        self
    }

    pub fn with_default(mut self, default: impl Into<ParameterValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark a choice as ordered (values are comparable, e.g. layer widths).
    pub fn ordered(mut self) -> Self {
        if let ParameterDomain::Choice { ordered, .. } = &mut self.domain {
            *ordered = true;
        }
        self
    }

    /// Check the declared constraints.
    pub fn validate(&self) -> Result<()> {
        let name = &self.name;
        match &self.domain {
            ParameterDomain::Int { min, max, step, sampling } => {
                if min > max {
                    return Err(HPOError::InvalidRange {
                        name: name.clone(),
                        min: *min as f64,
                        max: *max as f64,
                    });
                }
                if *step <= 0 {
                    return Err(HPOError::InvalidStep { name: name.clone(), step: *step as f64 });
                }
                if *sampling == Sampling::Log && *min <= 0 {
                    return Err(HPOError::InvalidLogBounds(name.clone()));
                }
            }
            ParameterDomain::Float { min, max, step, sampling } => {
                if !min.is_finite() || !max.is_finite() || min > max {
                    return Err(HPOError::InvalidRange { name: name.clone(), min: *min, max: *max });
                }
                if let Some(step) = step {
                    if !step.is_finite() || *step <= 0.0 {
                        return Err(HPOError::InvalidStep { name: name.clone(), step: *step });
                    }
                }
                if *sampling == Sampling::Log && *min <= 0.0 {
                    return Err(HPOError::InvalidLogBounds(name.clone()));
                }
            }
            ParameterDomain::Choice { values, .. } => {
                let Some(first) = values.first() else {
                    return Err(HPOError::EmptyChoices(name.clone()));
                };
                if values.iter().any(|v| !v.same_kind(first)) {
                    return Err(HPOError::MixedChoiceTypes(name.clone()));
                }
            }
            ParameterDomain::Boolean | ParameterDomain::Fixed { .. } => {}
        }

        if let Some(default) = &self.default {
            if !self.domain.is_valid(default) {
                return Err(HPOError::InvalidDefault { name: name.clone(), value: default.to_string() });
            }
        }
        Ok(())
    }

    /// Explicit default, otherwise the natural one for the kind:
    /// `min` for ranges, the first choice, `false`, or the fixed value.
    pub fn default_value(&self) -> ParameterValue {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match &self.domain {
            ParameterDomain::Int { min, .. } => ParameterValue::Int(*min),
            ParameterDomain::Float { min, .. } => ParameterValue::Float(*min),
            ParameterDomain::Choice { values, .. } => values
                .first()
                .cloned()
                .unwrap_or(ParameterValue::Bool(false)),
            ParameterDomain::Boolean => ParameterValue::Bool(false),
            ParameterDomain::Fixed { value } => value.clone(),
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParameterValue {
        self.domain.sample(rng)
    }

    pub fn is_valid(&self, value: &ParameterValue) -> bool {
        self.domain.is_valid(value)
    }

    pub fn kind_name(&self) -> &'static str {
        self.domain.kind_name()
    }
}
