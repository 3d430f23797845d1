//! Training history reported by a fit

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-epoch metric values, as returned by one call to `fit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    metrics: BTreeMap<String, Vec<f64>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one epoch's value for `metric`.
    pub fn push(&mut self, metric: &str, value: f64) {
        self.metrics.entry(metric.to_string()).or_default().push(value);
    }

    /// Record a full epoch at once.
    pub fn push_epoch<'a>(&mut self, values: impl IntoIterator<Item = (&'a str, f64)>) {
        for (metric, value) in values {
            self.push(metric, value);
        }
    }

    pub fn get(&self, metric: &str) -> Option<&[f64]> {
        self.metrics.get(metric).map(Vec::as_slice)
    }

    /// Number of epochs (the longest recorded series).
    pub fn epochs(&self) -> usize {
        self.metrics.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Options forwarded to every `fit` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub epochs: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { epochs: 1, batch_size: None }
    }
}

impl FitOptions {
    pub fn epochs(epochs: usize) -> Self {
        Self { epochs, ..Self::default() }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
}
