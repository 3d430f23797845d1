//! Compilation settings: optimizer, loss and metrics

use serde::{Deserialize, Serialize};

/// Optimizer name plus optional learning rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,
}

impl OptimizerSpec {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), learning_rate: None }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = Some(learning_rate);
        self
    }
}

/// Compilation settings. Every field is optional so the same type doubles
/// as a set of overrides applied on top of what the callback chose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<String>>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optimizer(mut self, optimizer: OptimizerSpec) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    pub fn loss(mut self, loss: &str) -> Self {
        self.loss = Some(loss.to_string());
        self
    }

    pub fn metrics(mut self, metrics: &[&str]) -> Self {
        self.metrics = Some(metrics.iter().map(|m| (*m).to_string()).collect());
        self
    }

    /// No field is set.
    pub fn is_empty(&self) -> bool {
        self.optimizer.is_none() && self.loss.is_none() && self.metrics.is_none()
    }

    /// `self` with every field that `overrides` sets replaced.
    pub fn merged_with(&self, overrides: &CompileOptions) -> CompileOptions {
        CompileOptions {
            optimizer: overrides.optimizer.clone().or_else(|| self.optimizer.clone()),
            loss: overrides.loss.clone().or_else(|| self.loss.clone()),
            metrics: overrides.metrics.clone().or_else(|| self.metrics.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_overrides() {
        let base = CompileOptions::new()
            .optimizer(OptimizerSpec::new("adam").with_learning_rate(1e-3))
            .loss("sparse_categorical_crossentropy")
            .metrics(&["accuracy"]);
        let overrides = CompileOptions::new().optimizer(OptimizerSpec::new("sgd"));

        let merged = base.merged_with(&overrides);
        assert_eq!(merged.optimizer, Some(OptimizerSpec::new("sgd")));
        assert_eq!(merged.loss.as_deref(), Some("sparse_categorical_crossentropy"));
        assert_eq!(merged.metrics, Some(vec!["accuracy".to_string()]));
    }

    #[test]
    fn test_is_empty() {
        assert!(CompileOptions::new().is_empty());
        assert!(!CompileOptions::new().loss("mse").is_empty());
    }

    #[test]
    fn test_compile_options_yaml() {
        let yaml = "optimizer: {name: adam, learning_rate: 0.001}\nmetrics: [accuracy]\n";
        let options: CompileOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(options.optimizer.unwrap().learning_rate, Some(0.001));
        assert!(options.loss.is_none());
        assert_eq!(options.metrics.unwrap(), vec!["accuracy"]);
    }
}
