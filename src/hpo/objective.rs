//! Objective: the metric trials are ranked by, and its direction

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::{HPOError, Result};
use super::types::Trial;

/// Optimization direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Min,
    Max,
}

impl Direction {
    /// Is `a` strictly better than `b`?
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Min => a < b,
            Direction::Max => a > b,
        }
    }

    /// Ordering that sorts better values first. NaN sorts last.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    Direction::Min => ord,
                    Direction::Max => ord.reverse(),
                }
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Min => write!(f, "min"),
            Direction::Max => write!(f, "max"),
        }
    }
}

impl FromStr for Direction {
    type Err = HPOError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "min" | "minimize" => Ok(Direction::Min),
            "max" | "maximize" => Ok(Direction::Max),
            _ => Err(HPOError::UnknownDirection(s.to_string())),
        }
    }
}

const MAXIMIZED: &[&str] = &[
    "acc",
    "accuracy",
    "auc",
    "precision",
    "recall",
    "f1",
    "f1_score",
    "fbeta_score",
    "r2",
    "r2_score",
    "iou",
    "mean_iou",
    "true_positives",
    "true_negatives",
];

const MINIMIZED: &[&str] = &[
    "loss",
    "mse",
    "mae",
    "mape",
    "msle",
    "rmse",
    "hinge",
    "squared_hinge",
    "categorical_hinge",
    "huber",
    "logcosh",
    "poisson",
    "kl_divergence",
    "kld",
    "false_positives",
    "false_negatives",
];

/// Best-effort direction for a well-known metric name.
///
/// A leading `val_` is ignored. Accuracy-like metrics are maximized; losses,
/// errors, divergences and cross-entropies are minimized.
pub fn infer_direction(metric: &str) -> Option<Direction> {
    let name = metric.strip_prefix("val_").unwrap_or(metric).to_lowercase();
    if MAXIMIZED.contains(&name.as_str()) || name.ends_with("_accuracy") {
        return Some(Direction::Max);
    }
    if MINIMIZED.contains(&name.as_str())
        || name.ends_with("_loss")
        || name.ends_with("_error")
        || name.ends_with("crossentropy")
    {
        return Some(Direction::Min);
    }
    None
}

/// A named metric plus the direction trials are ranked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub name: String,
    pub direction: Direction,
}

impl Objective {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self { name: name.into(), direction }
    }

    /// Objective for a well-known metric name, e.g. `val_accuracy` (max) or
    /// `val_loss` (min).
    pub fn infer(name: &str) -> Result<Self> {
        infer_direction(name)
            .map(|direction| Self::new(name, direction))
            .ok_or_else(|| HPOError::UnknownObjectiveDirection(name.to_string()))
    }

    /// Best value in the objective's direction, ignoring NaN and infinities.
    pub fn best_of(&self, values: &[f64]) -> Option<f64> {
        values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .min_by(|a, b| self.direction.compare(*a, *b))
    }

    /// Completed trials that have a score, best first.
    pub fn rank<'a>(&self, trials: &'a [Trial]) -> Vec<&'a Trial> {
        let mut ranked: Vec<&Trial> =
            trials.iter().filter(|t| t.is_completed() && t.score.is_some()).collect();
        ranked.sort_by(|a, b| {
            let (a, b) = (a.score.unwrap_or(f64::NAN), b.score.unwrap_or(f64::NAN));
            self.direction.compare(a, b)
        });
        ranked
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Objective(name=\"{}\", direction=\"{}\")", self.name, self.direction)
    }
}

/// Objective as written in a config: a bare metric name whose direction is
/// inferred, or an explicit `{name, direction}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectiveSpec {
    Name(String),
    Explicit { name: String, direction: Direction },
}

impl ObjectiveSpec {
    pub fn resolve(&self) -> Result<Objective> {
        match self {
            ObjectiveSpec::Name(name) => Objective::infer(name),
            ObjectiveSpec::Explicit { name, direction } => Ok(Objective::new(name.clone(), *direction)),
        }
    }
}

impl Default for ObjectiveSpec {
    fn default() -> Self {
        ObjectiveSpec::Name("val_loss".to_string())
    }
}

impl From<&str> for ObjectiveSpec {
    fn from(name: &str) -> Self {
        ObjectiveSpec::Name(name.to_string())
    }
}

impl From<Objective> for ObjectiveSpec {
    fn from(objective: Objective) -> Self {
        ObjectiveSpec::Explicit { name: objective.name, direction: objective.direction }
    }
}
