//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crudsmith_core::domain::{Dialect, StartupScriptFlavor};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "crudsmith",
    bin_name = "crudsmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Express + Mongoose CRUD backends from entity schemas",
    long_about = "Crudsmith turns a JSON description of entities into a zipped, \
                  ready-to-run Express + Mongoose project in TypeScript or JavaScript.",
    after_help = "EXAMPLES:\n\
        \x20 crudsmith generate --schema shop.json\n\
        \x20 crudsmith gen -s shop.json --dialect js --output - > shop.zip\n\
        \x20 crudsmith dialects\n\
        \x20 crudsmith completions bash > /usr/share/bash-completion/completions/crudsmith",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project archive from an entity schema.
    #[command(
        visible_alias = "gen",
        about = "Generate a project archive",
        after_help = "EXAMPLES:\n\
            \x20 crudsmith generate --schema shop.json\n\
            \x20 crudsmith generate --schema - --name shop < entities.json\n\
            \x20 crudsmith generate --schema shop.json --dialect js --startup-script shell\n\
            \x20 crudsmith generate --schema shop.json --dry-run"
    )]
    Generate(GenerateArgs),

    /// List supported dialects.
    #[command(
        visible_alias = "ls",
        about = "List supported dialects",
        after_help = "EXAMPLES:\n\
            \x20 crudsmith dialects\n\
            \x20 crudsmith dialects --format json"
    )]
    Dialects(DialectsArgs),

    /// Initialise a Crudsmith configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 crudsmith init           # default location\n\
            \x20 crudsmith init --local   # .crudsmith.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 crudsmith completions bash > ~/.local/share/bash-completion/completions/crudsmith\n\
            \x20 crudsmith completions zsh  > ~/.zfunc/_crudsmith\n\
            \x20 crudsmith completions fish > ~/.config/fish/completions/crudsmith.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Crudsmith configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 crudsmith config get defaults.dialect\n\
            \x20 crudsmith config list\n\
            \x20 crudsmith config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `crudsmith generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// JSON payload with `projectName` and `entities`; `-` reads stdin.
    #[arg(
        short = 's',
        long = "schema",
        value_name = "FILE",
        help = "Entity schema (JSON file, or - for stdin)"
    )]
    pub schema: PathBuf,

    /// Target dialect; falls back to `defaults.dialect` from config.
    #[arg(
        short = 'd',
        long = "dialect",
        value_name = "DIALECT",
        value_enum,
        help = "Target dialect"
    )]
    pub dialect: Option<DialectArg>,

    /// Override the payload's project name.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Where to write the archive; `-` streams to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Archive destination (default: ./<project>.zip, - for stdout)"
    )]
    pub output: Option<PathBuf>,

    /// Overwrite an existing archive.
    #[arg(short = 'f', long = "force", help = "Overwrite an existing archive")]
    pub force: bool,

    /// Print the artifact plan without writing anything.
    #[arg(long = "dry-run", help = "Show what would be generated")]
    pub dry_run: bool,

    /// Parent directory for staging trees.
    #[arg(long = "staging-dir", value_name = "DIR", help = "Staging directory")]
    pub staging_dir: Option<PathBuf>,

    /// Stage under the bare project name instead of a unique one.
    #[arg(
        long = "shared-staging",
        help = "Use <staging-dir>/<project> (unsafe for concurrent runs)"
    )]
    pub shared_staging: bool,

    /// Startup script flavor.
    #[arg(
        long = "startup-script",
        value_name = "FLAVOR",
        value_enum,
        help = "Startup script flavor"
    )]
    pub startup_script: Option<StartupScriptArg>,
}

// ── dialects ──────────────────────────────────────────────────────────────────

/// Arguments for `crudsmith dialects`.
#[derive(Debug, Args)]
pub struct DialectsArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `dialects` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `crudsmith init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.crudsmith.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `crudsmith completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `crudsmith config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.dialect`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Dialects accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum DialectArg {
    /// Also accepted as `ts`.
    #[value(alias = "ts")]
    TypeScript,
    /// Also accepted as `js`.
    #[value(alias = "js")]
    JavaScript,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::TypeScript => Dialect::TypeScript,
            DialectArg::JavaScript => Dialect::JavaScript,
        }
    }
}

/// Startup script flavors accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StartupScriptArg {
    /// `start.bat`.
    #[value(alias = "bat")]
    Batch,
    /// `start.sh`.
    #[value(alias = "sh")]
    Shell,
}

impl From<StartupScriptArg> for StartupScriptFlavor {
    fn from(arg: StartupScriptArg) -> Self {
        match arg {
            StartupScriptArg::Batch => StartupScriptFlavor::Batch,
            StartupScriptArg::Shell => StartupScriptFlavor::Shell,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
