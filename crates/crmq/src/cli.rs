//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the crmq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// crmq - inspect, validate and apply CRM record filter presets
#[derive(Parser, Debug)]
#[command(name = "crmq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the operators a field type supports
    #[command(alias = "ops")]
    Operators {
        /// Field type (e.g. text, number, date, select)
        field_type: String,
    },

    /// Check a value against a field type and operator
    Validate {
        /// Field type (e.g. text, number, date, select)
        field_type: String,

        /// Operator (e.g. equals, greater_than, is_empty)
        operator: String,

        /// Value as JSON; plain text is taken as a string
        value: Option<String>,
    },

    /// Manage saved filter presets
    #[command(alias = "p")]
    Presets {
        #[command(subcommand)]
        command: PresetCommands,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Preset subcommands
#[derive(Subcommand, Debug)]
pub enum PresetCommands {
    /// List saved presets
    #[command(alias = "ls")]
    List,

    /// Show a preset's groups and predicates
    Show {
        /// Preset name
        name: String,
    },

    /// Restore a preset and print the flat filter list for the search API
    Apply {
        /// Preset name
        name: String,

        /// Print the nested expression instead of the flat list
        #[arg(long)]
        nested: bool,
    },

    /// Save a query from a JSON file as a preset
    Import {
        /// Preset name
        name: String,

        /// Path to a JSON file holding the query
        file: PathBuf,

        /// Field catalog (JSON list of {name, label, type}) to validate against
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Delete a preset
    #[command(alias = "rm")]
    Delete {
        /// Preset name
        name: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
