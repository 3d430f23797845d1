//! Structural description of a feed-forward model
//!
//! `Sequential` records the architecture a callback chose (layer widths,
//! activations, dropout) and how it is compiled. It carries no weights; a
//! [`Trainable`](super::Trainable) implementation turns it into something
//! that learns.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::compile::CompileOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    Softmax,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
            Activation::Softmax => "softmax",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Activation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Activation::Linear),
            "relu" => Ok(Activation::Relu),
            "tanh" => Ok(Activation::Tanh),
            "sigmoid" => Ok(Activation::Sigmoid),
            "softmax" => Ok(Activation::Softmax),
            _ => Err(format!("Unknown activation: {s}. Use: linear, relu, tanh, sigmoid, softmax")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    Flatten,
    Dense { units: usize, activation: Activation },
    Dropout { rate: f64 },
}

impl Layer {
    pub fn dense(units: usize, activation: Activation) -> Self {
        Layer::Dense { units, activation }
    }
}

/// A stack of layers plus its compilation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequential {
    layers: Vec<Layer>,
    compiled: Option<CompileOptions>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Units of every dense layer, in order.
    pub fn dense_units(&self) -> Vec<usize> {
        self.layers
            .iter()
            .filter_map(|l| match l {
                Layer::Dense { units, .. } => Some(*units),
                _ => None,
            })
            .collect()
    }

    /// Set (or, when already compiled, override) the compilation settings.
    pub fn compile(&mut self, options: &CompileOptions) {
        self.compiled = Some(match &self.compiled {
            Some(current) => current.merged_with(options),
            None => options.clone(),
        });
    }

    pub fn compiled(&self) -> Option<&CompileOptions> {
        self.compiled.as_ref()
    }

    /// Number of weights and biases for a flattened input of `input_dim` features.
    pub fn parameter_count(&self, input_dim: usize) -> usize {
        let mut width = input_dim;
        let mut total = 0;
        for layer in &self.layers {
            if let Layer::Dense { units, .. } = layer {
                total += width * units + units;
                width = *units;
            }
        }
        total
    }

    /// One line per layer plus the compilation settings.
    pub fn summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.layers.len() + 1);
        for (i, layer) in self.layers.iter().enumerate() {
            let line = match layer {
                Layer::Flatten => format!("{i}: flatten"),
                Layer::Dense { units, activation } => format!("{i}: dense({units}, {activation})"),
                Layer::Dropout { rate } => format!("{i}: dropout({rate})"),
            };
            lines.push(line);
        }
        if let Some(compiled) = &self.compiled {
            let optimizer = compiled.optimizer.as_ref().map_or("-", |o| o.name.as_str());
            let loss = compiled.loss.as_deref().unwrap_or("-");
            lines.push(format!("compiled: optimizer={optimizer}, loss={loss}"));
        }
        lines.join("\n")
    }
}
