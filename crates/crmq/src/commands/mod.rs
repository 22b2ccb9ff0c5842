//! Command implementations for the crmq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod operators;
pub mod presets;
pub mod validate;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Preset store error.
    #[error("preset error: {0}")]
    PresetStore(#[from] crm_filter_rs::PresetStoreError),

    /// A named preset does not exist.
    #[error("preset '{name}' not found{}", suggestion_suffix(.suggestion))]
    PresetNotFound {
        /// Requested preset name.
        name: String,
        /// A close existing name, if any.
        suggestion: Option<String>,
    },

    /// A query failed validation against a catalog.
    #[error("query is invalid:\n{0}")]
    InvalidQuery(String),

    /// A value failed validation.
    #[error("value is not valid for {field_type} {operator}")]
    InvalidValue {
        /// The field type checked against.
        field_type: String,
        /// The operator checked against.
        operator: String,
    },

    /// Bad argument value.
    #[error("{0}")]
    Usage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{s}'?"),
        None => String::new(),
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and config.
    ///
    /// `--no-color` and `NO_COLOR` win over `output.color` in the config file.
    pub fn from_cli(cli: &Cli, config: &config::Config) -> Self {
        let color_allowed = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
        Self {
            json_output: cli.json,
            use_colors: color_allowed && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}
