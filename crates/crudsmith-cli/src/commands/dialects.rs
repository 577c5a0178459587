//! Implementation of the `crudsmith dialects` command.

use serde::Serialize;

use crudsmith_core::domain::{ArtifactKind, Dialect};

use crate::{
    cli::{DialectsArgs, ListFormat, global::GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// What `dialects --format json` prints for each dialect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DialectInfo {
    name: Dialect,
    extension: &'static str,
    artifact_kinds: Vec<ArtifactKind>,
    files_per_entity: usize,
    project_files: usize,
    is_default: bool,
}

impl DialectInfo {
    fn new(dialect: Dialect, default: Dialect) -> Self {
        let kinds = dialect.artifact_kinds().to_vec();
        Self {
            name: dialect,
            extension: dialect.file_extension(),
            files_per_entity: dialect.entity_kind_count(),
            project_files: dialect.expected_file_count(0),
            artifact_kinds: kinds,
            is_default: dialect == default,
        }
    }

    fn formula(&self) -> String {
        format!("{}N+{}", self.files_per_entity, self.project_files)
    }
}

pub fn execute(
    args: DialectsArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let dialects: Vec<DialectInfo> = Dialect::ALL
        .into_iter()
        .map(|d| DialectInfo::new(d, config.defaults.dialect))
        .collect();

    match args.format {
        ListFormat::Table => {
            output.header("Available Dialects:")?;
            for info in &dialects {
                let marker = if info.is_default { " (default)" } else { "" };
                output.print(&format!(
                    "  {:<12} .{:<3} {:>6} files  [{}]{marker}",
                    info.name.to_string(),
                    info.extension,
                    info.formula(),
                    info.artifact_kinds
                        .iter()
                        .map(ArtifactKind::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                ))?;
            }
        }

        // JSON and bare names go to stdout so they can be piped.
        ListFormat::Json => output.json(&dialects)?,

        ListFormat::List => {
            for info in &dialects {
                println!("{}", info.name);
            }
        }
    }

    Ok(())
}
