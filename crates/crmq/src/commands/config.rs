//! Config command implementation.
//!
//! View configuration settings.
//! Config file is located at ~/.config/crmq/config.toml.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crm_filter_rs::{GroupIdGenerator, PresetStore, SequentialGroupIds, UuidGroupIds};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file path.
const CONFIG_ENV: &str = "CRMQ_CONFIG";

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Preset storage settings.
    #[serde(default)]
    pub presets: PresetsConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Group id settings.
    #[serde(default)]
    pub ids: IdsConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            presets: PresetsConfig::default(),
            output: OutputConfig::default(),
            ids: IdsConfig::default(),
        }
    }
}

/// Preset storage configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PresetsConfig {
    /// Presets file path (default: XDG data dir).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// How new group ids are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Random UUID v4.
    #[default]
    Uuid,
    /// `g1`, `g2`, ...
    Sequential,
}

/// Group id configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IdsConfig {
    /// Id strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<IdStrategy>,
}

impl Config {
    /// Returns the preset store this config points at.
    pub fn preset_store(&self) -> Result<PresetStore> {
        match &self.presets.path {
            Some(path) => Ok(PresetStore::with_path(path.clone())),
            None => Ok(PresetStore::new()?),
        }
    }

    /// Returns a group id generator for the configured strategy.
    pub fn id_generator(&self) -> Box<dyn GroupIdGenerator> {
        match self.ids.strategy.unwrap_or_default() {
            IdStrategy::Uuid => Box::new(UuidGroupIds),
            IdStrategy::Sequential => Box::new(SequentialGroupIds::new("g")),
        }
    }
}

/// Gets the config file path.
///
/// Order: `CRMQ_CONFIG`, then `$XDG_CONFIG_HOME/crmq/config.toml`, then
/// `~/.config/crmq/config.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("crmq").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("crmq").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk, or defaults if there is no file.
pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

/// Loads the configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext, config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("[presets]");
        match &config.presets.path {
            Some(p) => println!("  path: {}", p.display()),
            None => println!("  path: (default)"),
        }

        println!("\n[output]");
        if let Some(color) = config.output.color {
            println!("  color: {}", color);
        }

        println!("\n[ids]");
        let strategy = config.ids.strategy.unwrap_or_default();
        println!("  strategy: {:?}", strategy);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    if ctx.json_output {
        let output = serde_json::json!({ "path": path.display().to_string() });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
