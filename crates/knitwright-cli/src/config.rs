//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the values it resolves to
//! (request defaults, a [`TemplateSet`], a patterns directory).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `KNITWRIGHT__SECTION__KEY`
//! 3. Config file: `--config`, or `.knitwright.toml` in the current
//!    directory on top of the platform config file
//! 4. Built-in defaults (always present)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use knitwright_core::domain::{CraftType, InstructionKind, Language, LengthUnit, TemplateSet};

use crate::error::{CliError, CliResult};

/// File name of a project-local configuration.
pub const LOCAL_CONFIG: &str = ".knitwright.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Values filled into requests that leave them out.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Where user stitch patterns live.
    pub patterns: PatternsConfig,
    /// Instruction wording overrides, `templates.<craft>.<kind> = "..."`.
    pub templates: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub craft: CraftType,
    pub language: Language,
    pub abbreviate: bool,
    pub unit: LengthUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration: defaults, then file(s), then environment.
    ///
    /// A file named with `--config` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode built-in defaults")?;
        let mut builder = Config::builder().add_source(defaults);

        builder = match config_file {
            Some(path) => builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            ),
            None => builder
                .add_source(
                    File::from(Self::config_path())
                        .format(FileFormat::Toml)
                        .required(false),
                )
                .add_source(
                    File::from(Path::new(LOCAL_CONFIG))
                        .format(FileFormat::Toml)
                        .required(false),
                ),
        };

        builder
            .add_source(
                Environment::with_prefix("KNITWRIGHT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.knitwright.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "knitwright", "knitwright")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
    }

    /// Wording overrides as a [`TemplateSet`]. Placeholder checks happen when
    /// the set is handed to the calculation service.
    pub fn template_set(&self) -> CliResult<TemplateSet> {
        let mut set = TemplateSet::new();
        for (craft, kinds) in &self.templates {
            let craft: CraftType = craft.parse().map_err(|e| CliError::ConfigError {
                message: format!("[templates.{craft}]: {e}"),
                source: None,
            })?;
            for (kind, template) in kinds {
                let kind: InstructionKind = kind.parse().map_err(|e| CliError::ConfigError {
                    message: format!("templates.{craft}.{kind}: {e}"),
                    source: None,
                })?;
                set = set.with_override(craft, kind, template.clone());
            }
        }
        Ok(set)
    }

    /// Render as TOML, the format `init` writes.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
