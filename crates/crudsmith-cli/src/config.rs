//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`CRUDSMITH__SECTION__KEY`)
//! 3. Config file (`--config`, else the user config dir, else `.crudsmith.toml`)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crudsmith_core::{
    application::StagingSettings,
    domain::{Dialect, StagingStrategy, StartupScriptFlavor},
};

/// File name used for per-directory configuration.
pub const LOCAL_CONFIG_FILE: &str = ".crudsmith.toml";

const ENV_PREFIX: &str = "CRUDSMITH";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for generation.
    pub defaults: Defaults,
    /// Staging and packaging.
    pub generation: GenerationConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub dialect: Dialect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Parent of staging trees; system temp dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
    pub staging: StagingStrategy,
    pub startup_script: StartupScriptFlavor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl GenerationConfig {
    /// Staging settings for the core service.
    pub fn staging_settings(&self) -> StagingSettings {
        let defaults = StagingSettings::default();
        StagingSettings {
            output_root: self.staging_dir.clone().unwrap_or(defaults.output_root),
            strategy: self.staging,
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then file, then environment.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the user config file and `.crudsmith.toml` are
    /// read when present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true);
        Self::load_with(config_file.map(PathBuf::as_path), env)
    }

    fn load_with(config_file: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default()).context("Failed to seed default configuration")?,
        );

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml)),
            None => builder
                .add_source(
                    File::from(Self::config_path())
                        .format(FileFormat::Toml)
                        .required(false),
                )
                .add_source(
                    File::from(Path::new(LOCAL_CONFIG_FILE))
                        .format(FileFormat::Toml)
                        .required(false),
                ),
        };

        builder
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.crudsmith.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "crudsmith", "crudsmith")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Value of a dotted key, as shown by `crudsmith config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "defaults.dialect" => self.defaults.dialect.to_string(),
            "generation.staging_dir" => self
                .generation
                .staging_settings()
                .output_root
                .display()
                .to_string(),
            "generation.staging" => self.generation.staging.to_string(),
            "generation.startup_script" => self.generation.startup_script.as_str().to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Every key `get` understands.
    pub const KEYS: [&'static str; 6] = [
        "defaults.dialect",
        "generation.staging_dir",
        "generation.staging",
        "generation.startup_script",
        "output.no_color",
        "output.format",
    ];
}
