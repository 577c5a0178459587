//! Implementation of the `crudsmith generate` command.
//!
//! Responsibility: read the payload, translate CLI arguments and config into
//! service settings, call the core generation service, and report results.
//! No generation logic lives here.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crudsmith_adapters::{LocalFilesystem, TracingObserver, ZipArchiver, renderer_for};
use crudsmith_core::{
    application::{GenerationOutcome, GenerationPayload, GenerationService, StagingSettings},
    domain::{
        Dialect, GenerationRequest, ProjectArtifactSet, StagingDirectory, StagingStrategy,
        StartupScriptFlavor,
    },
    error::CrudsmithError,
};

use crate::{
    cli::{GenerateArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    interrupt::{self, LeftoverTracker, TrackingObserver},
    output::OutputManager,
};

const STDIO: &str = "-";

/// Execute the `crudsmith generate` command.
///
/// 1. Read and decode the payload (file or stdin)
/// 2. Resolve dialect, staging and startup script from flags and config
/// 3. Dry run: print the artifact plan and stop
/// 4. Guard the destination against accidental overwrite
/// 5. Generate, streaming the archive into the destination; an interrupt
///    removes the staging tree, transient archive and partial output
/// 6. Report the receipt
#[instrument(skip_all, fields(schema = %args.schema.display()))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    debug!(verbose = global.verbose, "Running generate");
    let request = read_request(&args.schema, args.name.as_deref())?;
    let settings = Settings::resolve(&args, &config);

    debug!(
        project = %request.project_name(),
        dialect = %settings.dialect,
        staging = %settings.staging.strategy,
        startup = %settings.startup,
        "Settings resolved"
    );

    let leftovers = LeftoverTracker::new();
    let service = GenerationService::new(
        renderer_for(settings.dialect),
        Box::new(LocalFilesystem::new()),
        Box::new(ZipArchiver::new()),
    )
    .with_observer(Box::new(TrackingObserver::new(
        leftovers.clone(),
        Box::new(TracingObserver::new()),
    )))
    .with_staging(settings.staging.clone())
    .with_startup_script(settings.startup);

    if args.dry_run {
        let plan = service.plan(&request).map_err(CliError::Core)?;
        return show_plan(&plan, &output);
    }

    let destination = Destination::resolve(args.output.as_deref(), request.project_name());
    if destination.is_stdout() && output.format() == OutputFormat::Json {
        return Err(CliError::InvalidInput {
            message: "--output - streams the archive on stdout; it cannot be combined with --output-format json".into(),
            source: None,
        });
    }
    if let Destination::File(path) = &destination {
        guard_staging_collision(path, request.project_name(), &settings.staging)?;
        guard_overwrite(path, args.force, confirm_overwrite)?;
        leftovers.track_output(path);
    }

    let spinner = output.spinner(&format!(
        "Generating {} project '{}'...",
        settings.dialect,
        request.project_name()
    ));
    info!(project = %request.project_name(), "Generation started");
    let interrupt_guard = interrupt::arm(leftovers)?;
    let result = destination.write_with(|sink| service.generate(&request, sink));
    drop(interrupt_guard);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let outcome = result?;

    report(&request, &destination, &outcome, settings.startup, &output)
}

// ── Payload ───────────────────────────────────────────────────────────────────

/// Read the payload from `schema` (or stdin for `-`) into a validated request.
pub fn read_request(schema: &Path, name_override: Option<&str>) -> CliResult<GenerationRequest> {
    let raw = if schema == Path::new(STDIO) {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .with_cli_context(|| "Failed to read schema from stdin")?;
        buf
    } else {
        if !schema.exists() {
            return Err(CliError::SchemaNotFound {
                path: schema.to_path_buf(),
            });
        }
        std::fs::read_to_string(schema)
            .with_cli_context(|| format!("Failed to read schema '{}'", schema.display()))?
    };

    parse_request(&raw, name_override)
}

fn parse_request(raw: &str, name_override: Option<&str>) -> CliResult<GenerationRequest> {
    let mut payload: GenerationPayload =
        serde_json::from_str(raw).map_err(|e| CliError::MalformedSchema {
            message: e.to_string(),
            source: e,
        })?;
    if let Some(name) = name_override {
        payload = payload.with_project_name(name);
    }

    GenerationRequest::try_from(payload).map_err(|e| CliError::Core(CrudsmithError::from(e)))
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Effective settings: flags first, then config.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    dialect: Dialect,
    staging: StagingSettings,
    startup: StartupScriptFlavor,
}

impl Settings {
    fn resolve(args: &GenerateArgs, config: &AppConfig) -> Self {
        let mut staging = config.generation.staging_settings();
        if let Some(dir) = &args.staging_dir {
            staging.output_root = dir.clone();
        }
        if args.shared_staging {
            staging.strategy = StagingStrategy::Shared;
        }

        Self {
            dialect: args.dialect.map(Dialect::from).unwrap_or(config.defaults.dialect),
            staging,
            startup: args
                .startup_script
                .map(StartupScriptFlavor::from)
                .unwrap_or(config.generation.startup_script),
        }
    }
}

// ── Destination ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    fn resolve(output: Option<&Path>, project_name: &str) -> Self {
        match output {
            Some(path) if path == Path::new(STDIO) => Self::Stdout,
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::File(PathBuf::from(format!("{project_name}.zip"))),
        }
    }

    fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }

    fn display(&self) -> String {
        match self {
            Self::Stdout => "<stdout>".into(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Run `generate` against this destination.  A partially written file
    /// is removed when generation fails.
    fn write_with<F>(&self, generate: F) -> CliResult<GenerationOutcome>
    where
        F: FnOnce(&mut dyn io::Write) -> Result<GenerationOutcome, CrudsmithError>,
    {
        match self {
            Self::Stdout => {
                let mut stdout = io::stdout().lock();
                generate(&mut stdout).map_err(CliError::Core)
            }
            Self::File(path) => {
                let mut file = File::create(path)
                    .with_cli_context(|| format!("Failed to create '{}'", path.display()))?;
                let result = generate(&mut file);
                drop(file);
                if result.is_err()
                    && let Err(e) = std::fs::remove_file(path)
                {
                    warn!(error = %e, path = %path.display(), "Could not remove partial archive");
                }
                result.map_err(CliError::Core)
            }
        }
    }
}

/// Shared staging reuses `<staging-dir>/<project>.zip` as its transient
/// archive, which cleanup deletes. Delivering to that same path would lose
/// the result.
fn guard_staging_collision(path: &Path, project_name: &str, staging: &StagingSettings) -> CliResult<()> {
    if staging.strategy != StagingStrategy::Shared {
        return Ok(());
    }
    let transient = StagingDirectory::allocate(&staging.output_root, project_name, staging.strategy);
    if same_location(path, transient.archive_path()) {
        return Err(CliError::InvalidInput {
            message: format!(
                "'{}' is the transient staging archive under --shared-staging; choose another --output or --staging-dir",
                path.display()
            ),
            source: None,
        });
    }
    Ok(())
}

fn same_location(a: &Path, b: &Path) -> bool {
    match (std::path::absolute(a), std::path::absolute(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Refuse to clobber an existing archive unless `--force` was given or the
/// user confirms interactively.
fn guard_overwrite<F>(path: &Path, force: bool, ask: F) -> CliResult<()>
where
    F: FnOnce(&Path) -> CliResult<Option<bool>>,
{
    if force || !path.exists() {
        return Ok(());
    }
    match ask(path)? {
        Some(true) => Ok(()),
        Some(false) => Err(CliError::Cancelled),
        None => Err(CliError::OutputExists {
            path: path.to_path_buf(),
        }),
    }
}

/// `None` when no one is there to ask.
#[cfg(feature = "interactive")]
fn confirm_overwrite(path: &Path) -> CliResult<Option<bool>> {
    use std::io::IsTerminal as _;

    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        return Ok(None);
    }
    dialoguer::Confirm::new()
        .with_prompt(format!("'{}' already exists. Overwrite?", path.display()))
        .default(false)
        .interact()
        .map(Some)
        .map_err(|e| CliError::InvalidInput {
            message: "Could not read confirmation".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_path: &Path) -> CliResult<Option<bool>> {
    Ok(None)
}

// ── Reporting ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlannedFile {
    path: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<String>,
    bytes: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkippedFile {
    entity: String,
    kind: String,
    reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanReport {
    project_name: String,
    dialect: Dialect,
    file_count: usize,
    files: Vec<PlannedFile>,
    skipped: Vec<SkippedFile>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationReceipt {
    project_name: String,
    dialect: Dialect,
    archive: String,
    file_name: String,
    content_disposition: String,
    bytes: u64,
    entries: usize,
    files_written: usize,
    skipped: Vec<SkippedFile>,
    generated_at: String,
}

fn plan_report(plan: &ProjectArtifactSet) -> PlanReport {
    PlanReport {
        project_name: plan.project_name().to_string(),
        dialect: plan.dialect(),
        file_count: plan.file_count(),
        files: plan
            .artifacts()
            .map(|a| PlannedFile {
                path: a.path.as_path().display().to_string(),
                kind: a.kind.to_string(),
                entity: a.entity.clone(),
                bytes: a.size(),
            })
            .collect(),
        skipped: plan
            .skipped()
            .filter_map(|slot| match slot {
                crudsmith_core::domain::ArtifactSlot::Skipped {
                    entity,
                    kind,
                    reason,
                } => Some(SkippedFile {
                    entity: entity.clone(),
                    kind: kind.to_string(),
                    reason: reason.clone(),
                }),
                _ => None,
            })
            .collect(),
    }
}

fn show_plan(plan: &ProjectArtifactSet, output: &OutputManager) -> CliResult<()> {
    let report = plan_report(plan);
    if output.format() == OutputFormat::Json {
        output.json(&report)?;
        return Ok(());
    }

    output.info(&format!(
        "Dry run: {} project '{}' would contain {} files",
        report.dialect, report.project_name, report.file_count
    ))?;
    for file in &report.files {
        output.print(&format!("  {:<48} {:>6} B", file.path, file.bytes))?;
    }
    for skip in &report.skipped {
        output.warning(&format!(
            "{} {} would be skipped: {}",
            skip.entity, skip.kind, skip.reason
        ))?;
    }
    Ok(())
}

fn report(
    request: &GenerationRequest,
    destination: &Destination,
    outcome: &GenerationOutcome,
    startup: StartupScriptFlavor,
    output: &OutputManager,
) -> CliResult<()> {
    let skipped: Vec<SkippedFile> = outcome
        .report
        .skipped
        .iter()
        .map(|s| SkippedFile {
            entity: s.entity.clone(),
            kind: s.kind.to_string(),
            reason: s.reason.clone(),
        })
        .collect();

    info!(
        project = %request.project_name(),
        bytes = outcome.receipt.bytes,
        skipped = skipped.len(),
        "Generation completed"
    );

    if output.format() == OutputFormat::Json {
        let receipt = GenerationReceipt {
            project_name: request.project_name().to_string(),
            dialect: outcome.dialect,
            archive: destination.display(),
            file_name: outcome.receipt.file_name.clone(),
            content_disposition: outcome.receipt.content_disposition(),
            bytes: outcome.receipt.bytes,
            entries: outcome.receipt.entries,
            files_written: outcome.report.files_written(),
            skipped,
            generated_at: Utc::now().to_rfc3339(),
        };
        output.json(&receipt)?;
        return Ok(());
    }

    for skip in &skipped {
        output.warning(&format!(
            "Skipped {} for {}: {}",
            skip.kind, skip.entity, skip.reason
        ))?;
    }
    output.success(&format!(
        "{} ({} files, {} bytes) written to {}",
        outcome.receipt.file_name,
        outcome.report.files_written(),
        outcome.receipt.bytes,
        destination.display()
    ))?;

    if !destination.is_stdout() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  unzip {}", destination.display()))?;
        output.print(&format!(
            "  run {} to install dependencies and start the server",
            startup.file_name()
        ))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
