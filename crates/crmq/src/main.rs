use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands, PresetCommands};
use commands::config::load_config;
use commands::presets::{PresetApplyOptions, PresetDeleteOptions, PresetImportOptions};
use commands::validate::ValidateOptions;
use commands::{CommandContext, CommandError};

/// Environment variable holding the log filter.
const ENV_LOG: &str = "CRMQ_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| e.to_string())
                );
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// `CRMQ_LOG` or `RUST_LOG` take precedence over the `--verbose` / `--quiet` defaults.
fn init_logging(cli: &Cli) {
    let default_filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .compact()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    match &cli.command {
        Commands::Operators { field_type } => commands::operators::execute(&ctx, field_type),
        Commands::Validate {
            field_type,
            operator,
            value,
        } => commands::validate::execute(
            &ctx,
            &ValidateOptions {
                field_type: field_type.clone(),
                operator: operator.clone(),
                value: value.clone(),
            },
        ),
        Commands::Presets { command } => match command {
            PresetCommands::List => commands::presets::execute_list(&ctx, &config).await,
            PresetCommands::Show { name } => {
                commands::presets::execute_show(&ctx, &config, name).await
            }
            PresetCommands::Apply { name, nested } => {
                let opts = PresetApplyOptions {
                    name: name.clone(),
                    nested: *nested,
                };
                commands::presets::execute_apply(&ctx, &config, &opts).await
            }
            PresetCommands::Import {
                name,
                file,
                catalog,
            } => {
                let opts = PresetImportOptions {
                    name,
                    file,
                    catalog: catalog.as_deref(),
                };
                commands::presets::execute_import(&ctx, &config, &opts).await
            }
            PresetCommands::Delete { name, force } => {
                let opts = PresetDeleteOptions {
                    name: name.clone(),
                    force: *force,
                };
                commands::presets::execute_delete(&ctx, &config, &opts).await
            }
        },
        Commands::Config { command } => match command {
            None | Some(ConfigCommands::Show) => commands::config::execute_show(&ctx, &config),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
        },
        Commands::Completions { shell } => Ok(commands::completions::execute(shell)?),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::PresetStore(_) => "PRESET_STORE_ERROR",
        CommandError::PresetNotFound { .. } => "PRESET_NOT_FOUND",
        CommandError::InvalidQuery(_) => "INVALID_QUERY",
        CommandError::InvalidValue { .. } => "INVALID_VALUE",
        CommandError::Usage(_) => "USAGE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::InvalidValue { .. } | CommandError::InvalidQuery(_) => ExitCode::from(1),
        CommandError::Usage(_) | CommandError::Json(_) => ExitCode::from(2),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::PresetNotFound { .. } => ExitCode::from(4),
        CommandError::Config(_) | CommandError::PresetStore(_) => ExitCode::from(5),
    }
}
