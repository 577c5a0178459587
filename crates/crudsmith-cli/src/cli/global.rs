//! Flags shared by every subcommand, flattened into [`super::Cli`].

use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log verbosity: `-v` reports pipeline steps, `-vv` every written file,
    /// `-vvv` everything.  `RUST_LOG` takes precedence when set.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Warnings and errors
    -v      - Pipeline steps (validate, write, archive, deliver)
    -vv     - Every artifact written to staging
    -vvv    - Trace level"
    )]
    pub verbose: u8,

    /// Only errors and requested results (archive bytes, JSON) are printed.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress progress and success messages"
    )]
    pub quiet: bool,

    /// Honours the `NO_COLOR` convention (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Read this TOML file instead of the user and local config files.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    /// Also write JSON log lines to this file.
    #[arg(
        long = "log-file",
        global = true,
        value_name = "FILE",
        env = "CRUDSMITH_LOG_FILE",
        help = "Write JSON logs to FILE"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format for messages and results"
    )]
    pub output_format: OutputFormat,
}

/// How the CLI renders messages and results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise.
    #[default]
    Auto,
    /// Colors, symbols and spinners.
    Human,
    /// No ANSI codes, no spinner.
    Plain,
    /// Results as JSON documents on stdout.
    Json,
}
