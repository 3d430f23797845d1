//! Seams between the tuner and user models
//!
//! A [`HyperModel`] builds one model per trial from a [`HyperParameters`]
//! handle; the model it returns is [`Trainable`] on some dataset type `D`.
//! Any closure `Fn(&mut HyperParameters) -> Result<M>` is a hypermodel.

mod compile;
mod history;
mod sequential;

pub use compile::{CompileOptions, OptimizerSpec};
pub use history::{FitOptions, History};
pub use sequential::{Activation, Layer, Sequential};

use crate::error::{Error, Result};
use crate::hpo::HyperParameters;

/// A model that can be compiled and fitted on data of type `D`.
pub trait Trainable<D> {
    /// Train and return the per-epoch history. The history must contain the
    /// tuner's objective metric.
    fn fit(&mut self, train: &D, validation: Option<&D>, options: &FitOptions) -> Result<History>;

    /// Apply compilation overrides. Models that cannot be recompiled accept
    /// only empty overrides.
    fn compile(&mut self, options: &CompileOptions) -> Result<()> {
        if options.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigError(
                "model does not support compile overrides".to_string(),
            ))
        }
    }
}

/// Builds (and optionally fits) a model for one assignment of hyperparameters.
///
/// `build` must be deterministic given the same handle responses and may
/// declare hyperparameters under any control flow.
pub trait HyperModel<D> {
    type Model: Trainable<D>;

    fn build(&self, hp: &mut HyperParameters) -> Result<Self::Model>;

    /// Fit a freshly built model. Override to make fitting itself tunable.
    fn fit(
        &self,
        _hp: &mut HyperParameters,
        model: &mut Self::Model,
        train: &D,
        validation: Option<&D>,
        options: &FitOptions,
    ) -> Result<History> {
        model.fit(train, validation, options)
    }
}

impl<D, M, F> HyperModel<D> for F
where
    F: Fn(&mut HyperParameters) -> Result<M>,
    M: Trainable<D>,
{
    type Model = M;

    fn build(&self, hp: &mut HyperParameters) -> Result<M> {
        self(hp)
    }
}
