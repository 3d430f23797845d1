//! Summary command implementation

use afinar_common::{OutputFormat, Result, TableBuilder};

use super::{load_project, Project};
use crate::cli::logging::log;
use crate::cli::{LogLevel, SummaryArgs};
use crate::tuner::ResultsSummary;

pub fn run_summary(args: &SummaryArgs, level: LogLevel) -> Result<()> {
    let project = load_project(&args.project)?;
    log(level, LogLevel::Verbose, &format!("Loaded {} trials", project.trials.len()));
    print!("{}", render_summary(&project, args.num_trials, args.project.format)?);
    Ok(())
}

pub(super) fn render_summary(project: &Project, num_trials: usize, format: OutputFormat) -> Result<String> {
    let summary = ResultsSummary::new(
        project.store.root().to_path_buf(),
        &project.state.objective,
        &project.trials,
        num_trials,
    );

    match format {
        OutputFormat::Text => Ok(summary.to_string()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&summary)?)),
        OutputFormat::Table => {
            let mut builder = TableBuilder::new().headers(vec!["Trial", "Score", "Hyperparameters"]);
            for trial in &summary.trials {
                let values: Vec<String> =
                    trial.hyperparameters.iter().map(|(k, v)| format!("{k}={v}")).collect();
                let score = trial.score.map_or_else(|| "-".to_string(), |s| format!("{s:.4}"));
                builder = builder.row(vec![trial.id.clone(), score, values.join(" ")]);
            }
            Ok(builder.build().to_string())
        }
    }
}
