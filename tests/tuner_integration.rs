//! End-to-end search tests against toy models

use afinar::data::ImageDataset;
use afinar::hpo::{
    Assignment, Direction, HyperParameter, Objective, Oracle, ParameterValue, RandomSearch,
    SearchSpace, TrialStatus,
};
use afinar::model::{
    Activation, CompileOptions, FitOptions, History, HyperModel, Layer, OptimizerSpec, Sequential,
    Trainable,
};
use afinar::{Error, HyperParameters, Result, Trial, Tuner, TunerConfig};
use approx::assert_relative_eq;
use ndarray::{Array1, Array3};
use std::cell::Cell;
use tempfile::TempDir;

/// Model whose validation accuracy peaks at 256 units.
struct Toy {
    model: Sequential,
    units: usize,
}

impl Trainable<()> for Toy {
    fn fit(&mut self, _: &(), _: Option<&()>, options: &FitOptions) -> Result<History> {
        let mut history = History::new();
        let peak = 1.0 - (self.units as f64 - 256.0).abs() / 512.0;
        for epoch in 0..options.epochs {
            let progress = (epoch + 1) as f64 / options.epochs as f64;
            history.push_epoch([("val_accuracy", peak * progress), ("loss", 1.0 - peak * progress)]);
        }
        Ok(history)
    }

    fn compile(&mut self, options: &CompileOptions) -> Result<()> {
        self.model.compile(options);
        Ok(())
    }
}

fn build_toy(hp: &mut HyperParameters) -> Result<Toy> {
    let mut model = Sequential::new().add(Layer::Flatten);
    let num_layers = hp.int("num_layers", 1, 3, 1)?;
    let mut units = 0;
    for i in 0..num_layers {
        units = hp.int(&format!("units_{i}"), 32, 512, 32)? as usize;
        model.push(Layer::dense(units, Activation::Relu));
    }
    model.push(Layer::dense(10, Activation::Softmax));
    let lr = hp.choice("learning_rate", &[1e-2, 1e-3, 1e-4])?;
    model.compile(&CompileOptions::new()
        .optimizer(OptimizerSpec::new("adam").with_learning_rate(lr))
        .loss("sparse_categorical_crossentropy")
        .metrics(&["accuracy"]));
    Ok(Toy { model, units })
}

fn config(tmp: &TempDir, max_trials: usize) -> TunerConfig {
    TunerConfig::new("val_accuracy")
        .with_project(tmp.path(), "helloworld")
        .with_max_trials(max_trials)
        .with_seed(42)
}

#[test]
fn test_search_fills_trials_with_reached_names_only() {
    let tmp = TempDir::new().unwrap();
    let mut tuner = Tuner::new(build_toy, config(&tmp, 6)).unwrap();
    tuner.search(&(), None, &FitOptions::epochs(2)).unwrap();

    assert_eq!(tuner.trials().len(), 6);
    for trial in tuner.trials() {
        assert_eq!(trial.status, TrialStatus::Completed);
        let layers = trial.hyperparameters["num_layers"].as_int().unwrap();
        let unit_names =
            trial.hyperparameters.keys().filter(|k| k.starts_with("units_")).count();
        assert_eq!(unit_names as i64, layers);
        assert!(trial.hyperparameters.contains_key("learning_rate"));
    }
    assert_eq!(tuner.objective().direction, Direction::Max);
}

#[test]
fn test_best_model_reflects_best_assignment() {
    let tmp = TempDir::new().unwrap();
    let mut tuner = Tuner::new(build_toy, config(&tmp, 5)).unwrap();
    tuner.search(&(), None, &FitOptions::epochs(1)).unwrap();

    let best = &tuner.get_best_hyperparameters(1)[0];
    let models = tuner.get_best_models(1).unwrap();
    let layers = best["num_layers"].as_int().unwrap() as usize;
    let expected: Vec<usize> = (0..layers)
        .map(|i| best[&format!("units_{i}")].as_int().unwrap() as usize)
        .chain(std::iter::once(10))
        .collect();
    assert_eq!(models[0].model.dense_units(), expected);

    // rebuilding twice yields the same structure
    let again = tuner.get_best_models(1).unwrap();
    assert_eq!(models[0].model, again[0].model);
}

#[test]
fn test_results_are_persisted_and_resumed() {
    let tmp = TempDir::new().unwrap();
    let mut first = Tuner::new(build_toy, config(&tmp, 3)).unwrap();
    first.search(&(), None, &FitOptions::default()).unwrap();
    let first_ids: Vec<String> = first.trials().iter().map(|t| t.id.clone()).collect();
    assert!(tmp.path().join("helloworld").join("tuner.json").is_file());
    assert!(tmp.path().join("helloworld").join(format!("trial_{}", first_ids[0])).is_dir());

    let mut resumed = Tuner::new(build_toy, config(&tmp, 5)).unwrap();
    assert_eq!(resumed.trials().len(), 3);
    resumed.search(&(), None, &FitOptions::default()).unwrap();
    assert_eq!(resumed.trials().len(), 5);

    let ids: Vec<&str> = resumed.trials().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(&ids[..3], first_ids.iter().map(String::as_str).collect::<Vec<_>>().as_slice());
    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 5);
}

#[test]
fn test_finished_project_runs_no_more_trials() {
    let tmp = TempDir::new().unwrap();
    Tuner::new(build_toy, config(&tmp, 2)).unwrap().search(&(), None, &FitOptions::default()).unwrap();

    let mut again = Tuner::new(build_toy, config(&tmp, 2)).unwrap();
    again.search(&(), None, &FitOptions::default()).unwrap();
    assert_eq!(again.trials().len(), 2);
}

#[test]
fn test_overwrite_discards_previous_run() {
    let tmp = TempDir::new().unwrap();
    Tuner::new(build_toy, config(&tmp, 2)).unwrap().search(&(), None, &FitOptions::default()).unwrap();

    let fresh = Tuner::<_, ()>::new(build_toy, config(&tmp, 2).with_overwrite(true)).unwrap();
    assert!(fresh.trials().is_empty());
}

#[test]
fn test_resume_with_other_objective_is_rejected() {
    let tmp = TempDir::new().unwrap();
    Tuner::new(build_toy, config(&tmp, 1)).unwrap().search(&(), None, &FitOptions::default()).unwrap();

    let other = TunerConfig::new("loss").with_project(tmp.path(), "helloworld");
    assert!(matches!(Tuner::<_, ()>::new(build_toy, other), Err(Error::ConfigError(_))));
}

#[test]
fn test_loss_objective_prefers_lower_values() {
    let tmp = TempDir::new().unwrap();
    let config = TunerConfig::new("loss").with_project(tmp.path(), "loss").with_max_trials(4).with_seed(3);
    let mut tuner = Tuner::new(build_toy, config).unwrap();
    tuner.search(&(), None, &FitOptions::epochs(3)).unwrap();

    let ranked = tuner.best_trials(4);
    for pair in ranked.windows(2) {
        assert!(pair[0].score.unwrap() <= pair[1].score.unwrap());
    }
}

#[test]
fn test_compile_overrides_apply_to_best_models() {
    let tmp = TempDir::new().unwrap();
    let overrides = CompileOptions::new().optimizer(OptimizerSpec::new("sgd").with_learning_rate(0.1));
    let mut tuner = Tuner::new(build_toy, config(&tmp, 2).with_compile(overrides)).unwrap();
    tuner.search(&(), None, &FitOptions::default()).unwrap();

    let model = tuner.get_best_models(1).unwrap().remove(0);
    let compiled = model.model.compiled().unwrap();
    assert_eq!(compiled.optimizer.as_ref().unwrap().name, "sgd");
    assert_eq!(compiled.loss.as_deref(), Some("sparse_categorical_crossentropy"));
}

struct Frozen;

impl Trainable<()> for Frozen {
    fn fit(&mut self, _: &(), _: Option<&()>, _: &FitOptions) -> Result<History> {
        let mut history = History::new();
        history.push("val_accuracy", 0.5);
        Ok(history)
    }
}

#[test]
fn test_compile_overrides_on_uncompilable_model_abort() {
    let tmp = TempDir::new().unwrap();
    let build = |hp: &mut HyperParameters| -> Result<Frozen> {
        hp.int("units", 1, 4, 1)?;
        Ok(Frozen)
    };
    let config = config(&tmp, 3).with_compile(CompileOptions::new().loss("mse"));
    let mut tuner = Tuner::new(build, config).unwrap();
    let err = tuner.search(&(), None, &FitOptions::default()).unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
    assert!(tuner.trials().is_empty());
}

struct Diverging;

impl Trainable<()> for Diverging {
    fn fit(&mut self, _: &(), _: Option<&()>, _: &FitOptions) -> Result<History> {
        Err(Error::TrialFailed { trial_id: String::new(), message: "loss is NaN".to_string() })
    }
}

#[test]
fn test_consecutive_failures_abort_search() {
    let tmp = TempDir::new().unwrap();
    let build = |hp: &mut HyperParameters| -> Result<Diverging> {
        hp.float("learning_rate", 1e-4, 1e-1)?;
        Ok(Diverging)
    };
    let mut tuner = Tuner::new(build, config(&tmp, 10)).unwrap();
    let err = tuner.search(&(), None, &FitOptions::default()).unwrap_err();
    assert!(matches!(err, Error::TooManyFailures(3)));
    assert_eq!(tuner.trials().len(), 3);
    assert!(tuner.trials().iter().all(|t| t.status == TrialStatus::Failed));
    assert!(tuner.trials()[0].message.as_deref().unwrap().contains("loss is NaN"));
    assert!(tuner.get_best_hyperparameters(1).is_empty());
}

/// Accuracy grows with width while the loss blows up.
struct Exploding(i64);

impl Trainable<()> for Exploding {
    fn fit(&mut self, _: &(), _: Option<&()>, _: &FitOptions) -> Result<History> {
        let mut history = History::new();
        history.push_epoch([("val_accuracy", self.0 as f64 / 100.0), ("loss", f64::INFINITY)]);
        Ok(history)
    }
}

#[test]
fn test_infinite_metrics_do_not_break_resume() {
    let tmp = TempDir::new().unwrap();
    let build = |hp: &mut HyperParameters| -> Result<Exploding> {
        Ok(Exploding(hp.int("units", 1, 100, 1)?))
    };
    let mut first = Tuner::new(build, config(&tmp, 2)).unwrap();
    first.search(&(), None, &FitOptions::default()).unwrap();
    for trial in first.trials() {
        assert_eq!(trial.status, TrialStatus::Completed);
        assert!(!trial.metrics.contains_key("loss"));
        assert!(trial.metrics.contains_key("val_accuracy"));
    }

    let mut resumed = Tuner::new(build, config(&tmp, 4)).unwrap();
    assert_eq!(resumed.trials().len(), 2);
    resumed.search(&(), None, &FitOptions::default()).unwrap();
    assert_eq!(resumed.trials().len(), 4);
}

#[test]
fn test_infinite_objective_fails_the_trial() {
    let tmp = TempDir::new().unwrap();
    let build = |hp: &mut HyperParameters| -> Result<Exploding> {
        Ok(Exploding(hp.int("units", 1, 100, 1)?))
    };
    let config = TunerConfig::new("loss").with_project(tmp.path(), "exploding").with_max_trials(2);
    let mut tuner = Tuner::new(build, config.clone()).unwrap();
    assert!(tuner.search(&(), None, &FitOptions::default()).is_ok());
    assert!(tuner.trials().iter().all(|t| t.status == TrialStatus::Failed));

    let reopened = Tuner::<_, ()>::new(build, config).unwrap();
    assert_eq!(reopened.trials().len(), 2);
}

#[test]
fn test_presupplied_entries_and_untuned_new_names() {
    let tmp = TempDir::new().unwrap();
    let mut space = SearchSpace::new();
    space.register(HyperParameter::choice("learning_rate", [1e-2, 1e-3])).unwrap();

    let build = |hp: &mut HyperParameters| -> Result<Toy> {
        let lr = hp.float("learning_rate", 1e-4, 1e-1)?;
        let units = hp.int("units", 32, 512, 32)?;
        let mut model = Sequential::new().add(Layer::dense(units as usize, Activation::Relu));
        model.compile(&CompileOptions::new().optimizer(OptimizerSpec::new("adam").with_learning_rate(lr)));
        Ok(Toy { model, units: units as usize })
    };
    let config = config(&tmp, 5).with_hyperparameters(space).with_tune_new_entries(false);
    let mut tuner = Tuner::new(build, config).unwrap();
    tuner.search(&(), None, &FitOptions::default()).unwrap();

    // two learning rates and a pinned unit count leave two distinct candidates
    assert_eq!(tuner.trials().len(), 2);
    for trial in tuner.trials() {
        assert_eq!(trial.hyperparameters["units"], ParameterValue::Int(32));
        let lr = trial.hyperparameters["learning_rate"].as_float().unwrap();
        assert!(lr == 1e-2 || lr == 1e-3);
    }
    assert_eq!(tuner.search_space().get("learning_rate").unwrap().kind_name(), "Choice");
    assert_eq!(tuner.search_space().get("units").unwrap().kind_name(), "Fixed");
}

/// Reports `val_loss` equal to the number of builds so far.
struct Counting {
    builds: Cell<usize>,
}

struct Constant(f64);

impl Trainable<()> for Constant {
    fn fit(&mut self, _: &(), _: Option<&()>, _: &FitOptions) -> Result<History> {
        let mut history = History::new();
        history.push("val_loss", self.0);
        Ok(history)
    }
}

impl HyperModel<()> for Counting {
    type Model = Constant;

    fn build(&self, hp: &mut HyperParameters) -> Result<Constant> {
        hp.boolean("shuffle")?;
        self.builds.set(self.builds.get() + 1);
        Ok(Constant(self.builds.get() as f64))
    }

    fn fit(
        &self,
        hp: &mut HyperParameters,
        model: &mut Constant,
        train: &(),
        validation: Option<&()>,
        options: &FitOptions,
    ) -> Result<History> {
        let batch_size = hp.choice("batch_size", &[32usize, 64])?;
        model.fit(train, validation, &options.clone().with_batch_size(batch_size))
    }
}

#[test]
fn test_executions_are_averaged_and_fit_can_declare() {
    let tmp = TempDir::new().unwrap();
    let config = TunerConfig::new("val_loss")
        .with_project(tmp.path(), "counting")
        .with_max_trials(1)
        .with_executions_per_trial(2)
        .with_seed(1);
    let mut tuner = Tuner::new(Counting { builds: Cell::new(0) }, config).unwrap();
    tuner.search(&(), None, &FitOptions::default()).unwrap();

    // build 1 discovers the space; builds 2 and 3 are the two executions
    let trial = &tuner.trials()[0];
    assert_relative_eq!(trial.score.unwrap(), 2.5);
    assert_relative_eq!(trial.metrics["val_loss"], 2.5);
    assert!(trial.hyperparameters.contains_key("batch_size"));
    assert!(tuner.search_space().contains("batch_size"));
}

/// Hands out a fixed list of assignments.
struct Scripted {
    queue: Vec<Assignment>,
}

impl Oracle for Scripted {
    fn suggest(&mut self, _space: &SearchSpace) -> afinar::hpo::Result<Option<Assignment>> {
        Ok(if self.queue.is_empty() { None } else { Some(self.queue.remove(0)) })
    }

    fn record(&mut self, _trial: &Trial) {}

    fn name(&self) -> &str {
        "scripted"
    }
}

#[test]
fn test_custom_oracle_drives_search() {
    let tmp = TempDir::new().unwrap();
    let assignment = |units: i64| -> Assignment {
        [
            ("num_layers".to_string(), ParameterValue::Int(1)),
            ("units_0".to_string(), ParameterValue::Int(units)),
            ("learning_rate".to_string(), ParameterValue::Float(1e-3)),
        ]
        .into_iter()
        .collect()
    };
    let oracle = Scripted { queue: vec![assignment(64), assignment(256)] };
    let mut tuner = Tuner::new(build_toy, config(&tmp, 10)).unwrap().with_oracle(oracle);
    tuner.search(&(), None, &FitOptions::default()).unwrap();

    assert_eq!(tuner.trials().len(), 2);
    let best = &tuner.get_best_hyperparameters(1)[0];
    assert_eq!(best["units_0"], ParameterValue::Int(256));
    assert_relative_eq!(tuner.best_trials(1)[0].score.unwrap(), 1.0);
}

#[test]
fn test_results_summary_text() {
    let tmp = TempDir::new().unwrap();
    let mut tuner = Tuner::new(build_toy, config(&tmp, 3)).unwrap();
    tuner.search(&(), None, &FitOptions::default()).unwrap();

    let text = tuner.results_summary(2).to_string();
    assert!(text.starts_with("Results summary\n"));
    assert!(text.contains("Showing 2 best trials"));
    assert!(text.contains("Objective(name=\"val_accuracy\", direction=\"max\")"));
    assert!(tuner.search_space_summary().to_string().contains("num_layers (Int)"));
}

/// Classifies an image as `1` when its mean intensity exceeds a tuned threshold.
struct Threshold(f32);

impl Trainable<ImageDataset> for Threshold {
    fn fit(
        &mut self,
        _train: &ImageDataset,
        validation: Option<&ImageDataset>,
        options: &FitOptions,
    ) -> Result<History> {
        let data = validation.ok_or_else(|| Error::Dataset("validation split required".into()))?;
        let correct = data
            .images
            .outer_iter()
            .zip(data.labels.iter())
            .filter(|(image, label)| {
                let mean = image.mean().unwrap_or(0.0);
                u8::from(mean > self.0) == **label
            })
            .count();
        let accuracy = correct as f64 / data.len() as f64;
        let mut history = History::new();
        for _ in 0..options.epochs {
            history.push("val_accuracy", accuracy);
        }
        Ok(history)
    }
}

#[test]
fn test_search_on_image_dataset() {
    let tmp = TempDir::new().unwrap();
    // dark images are class 0, bright images class 1
    let raw = Array3::from_shape_fn((20, 4, 4), |(i, _, _)| if i % 2 == 0 { 20u8 } else { 230 });
    let labels = Array1::from_iter((0..20).map(|i| (i % 2) as u8));
    let mut train = ImageDataset::from_raw(&raw, labels).unwrap();
    let validation = train.split_off_validation(6).unwrap();

    let build = |hp: &mut HyperParameters| -> Result<Threshold> {
        Ok(Threshold(hp.choice("threshold", &[0.05f64, 0.5, 0.95])? as f32))
    };
    let config = TunerConfig::new(Objective::new("val_accuracy", Direction::Max))
        .with_project(tmp.path(), "threshold")
        .with_max_trials(3)
        .with_seed(0);
    let oracle = RandomSearch::new(0).with_max_collisions(200);
    let mut tuner = Tuner::new(build, config).unwrap().with_oracle(oracle);
    tuner.search(&train, Some(&validation), &FitOptions::default()).unwrap();

    let best = &tuner.get_best_hyperparameters(1)[0];
    assert_eq!(best["threshold"], ParameterValue::Float(0.5));
    assert_relative_eq!(tuner.best_trials(1)[0].score.unwrap(), 1.0);
}
