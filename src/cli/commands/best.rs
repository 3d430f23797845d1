//! Best command implementation

use afinar_common::{AfinarError, OutputFormat, Result, TableBuilder};

use super::{load_project, Project};
use crate::cli::logging::log;
use crate::cli::{LogLevel, SummaryArgs};

pub fn run_best(args: &SummaryArgs, level: LogLevel) -> Result<()> {
    let project = load_project(&args.project)?;
    log(
        level,
        LogLevel::Verbose,
        &format!("Ranking by {}", project.state.objective),
    );
    print!("{}", render_best(&project, args.num_trials, args.project.format)?);
    Ok(())
}

pub(super) fn render_best(project: &Project, num_trials: usize, format: OutputFormat) -> Result<String> {
    let best: Vec<_> =
        project.state.objective.rank(&project.trials).into_iter().take(num_trials).collect();
    if best.is_empty() {
        return Err(AfinarError::NoCompletedTrials {
            project: project.store.root().display().to_string(),
        });
    }

    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for trial in &best {
                out.push_str(&format!("Trial {} (score {})\n", trial.id, trial.score.unwrap_or(f64::NAN)));
                for (name, value) in &trial.hyperparameters {
                    out.push_str(&format!("  {name}: {value}\n"));
                }
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let assignments: Vec<_> = best.iter().map(|t| &t.hyperparameters).collect();
            Ok(format!("{}\n", serde_json::to_string_pretty(&assignments)?))
        }
        OutputFormat::Table => {
            let names: Vec<String> = project.state.search_space.names().into_iter().map(str::to_string).collect();
            let mut headers = vec!["Trial".to_string()];
            headers.extend(names.iter().cloned());
            let mut builder = TableBuilder::new().headers(headers);
            for trial in &best {
                let mut row = vec![trial.id.clone()];
                row.extend(names.iter().map(|name| {
                    trial.hyperparameters.get(name).map_or_else(|| "-".to_string(), ToString::to_string)
                }));
                builder = builder.row(row);
            }
            Ok(builder.build().to_string())
        }
    }
}
