//! Space command implementation

use afinar_common::{OutputFormat, Result, TableBuilder};

use super::{load_project, Project};
use crate::cli::{LogLevel, ProjectArgs};
use crate::tuner::SearchSpaceSummary;

pub fn run_space(args: &ProjectArgs, _level: LogLevel) -> Result<()> {
    let project = load_project(args)?;
    print!("{}", render_space(&project, args.format)?);
    Ok(())
}

pub(super) fn render_space(project: &Project, format: OutputFormat) -> Result<String> {
    let summary = SearchSpaceSummary::new(&project.state.search_space);

    match format {
        OutputFormat::Text => Ok(summary.to_string()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&summary)?)),
        OutputFormat::Table => {
            let mut builder = TableBuilder::new().headers(vec!["Name", "Kind", "Domain", "Default", "Pinned"]);
            for param in &summary.params {
                let pinned = project.state.overrides.contains(&param.name);
                builder = builder.row(vec![
                    param.name.clone(),
                    param.kind_name().to_string(),
                    param.domain.to_string(),
                    param.default_value().to_string(),
                    (if pinned { "yes" } else { "no" }).to_string(),
                ]);
            }
            Ok(builder.build().to_string())
        }
    }
}
