//! Afinar: hyperparameter tuning harness
//!
//! A model-building callback asks a [`HyperParameters`] handle for values;
//! every call declares a hyperparameter in the search space and returns the
//! value the current trial uses. A [`Tuner`] invokes the callback once per
//! trial, fits the model it returns, ranks trials by an [`Objective`] and
//! persists them under `directory/project_name`.
//!
//! # Example
//!
//! ```no_run
//! use afinar::model::{Activation, FitOptions, History, Layer, Sequential, Trainable};
//! use afinar::{HyperParameters, Tuner, TunerConfig};
//!
//! struct Net(Sequential);
//!
//! impl Trainable<Vec<f32>> for Net {
//!     fn fit(
//!         &mut self,
//!         _train: &Vec<f32>,
//!         _validation: Option<&Vec<f32>>,
//!         options: &FitOptions,
//!     ) -> afinar::Result<History> {
//!         let mut history = History::new();
//!         for _ in 0..options.epochs {
//!             history.push("val_accuracy", 0.9);
//!         }
//!         Ok(history)
//!     }
//! }
//!
//! fn build_model(hp: &mut HyperParameters) -> afinar::Result<Net> {
//!     let units = hp.int("units", 32, 512, 32)?;
//!     Ok(Net(Sequential::new()
//!         .add(Layer::Flatten)
//!         .add(Layer::dense(units as usize, Activation::Relu))
//!         .add(Layer::dense(10, Activation::Softmax))))
//! }
//!
//! let config = TunerConfig::new("val_accuracy")
//!     .with_max_trials(5)
//!     .with_executions_per_trial(3)
//!     .with_project("my_dir", "helloworld");
//! let mut tuner = Tuner::new(build_model, config)?;
//! tuner.search(&Vec::<f32>::new(), None, &FitOptions::epochs(5))?;
//! println!("{}", tuner.results_summary(10));
//! # Ok::<(), afinar::Error>(())
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod hpo;
pub mod model;
pub mod tuner;

pub use error::{Error, Result};
pub use hpo::{HyperParameters, Objective, SearchSpace, Trial};
pub use model::{HyperModel, Trainable};
pub use tuner::{Tuner, TunerConfig};
