//! disclink CLI - link documentation pages to their GitHub discussions
//!
//! Parses arguments, installs logging, loads configuration and dispatches to
//! the command implementations in [`commands`].
use anyhow::Result;
use clap::Parser;
use disclink_core::Config;
use tracing::debug;

pub mod cli;
mod commands;
pub mod error;
mod output;
mod utils;

use crate::cli::{CacheCommands, Cli, Commands};
use crate::error::CliError;
use crate::utils::initialize_logging;

/// Execute the disclink CLI with the currently configured environment.
///
/// # Errors
///
/// Returns an error if logging cannot be installed, the configuration is
/// invalid, or the command fails. Resolutions never fail; a rate-limited
/// lookup is reported as a normal outcome.
pub async fn run() -> Result<()> {
    // Convert Broken pipe panics into a clean exit
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe") || msg.contains("broken pipe") {
            std::process::exit(0);
        }
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let config = Config::load(cli.config.as_deref()).map_err(CliError::from)?;
    debug!(
        "Using repository {} via {}",
        config.repository.slug(),
        config.repository.api_base
    );

    execute_command(cli, &config).await
}

async fn execute_command(cli: Cli, config: &Config) -> Result<()> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Resolve(args) => {
            commands::resolve_page(
                config,
                &args.path,
                args.title.as_deref(),
                args.no_cache,
                args.content.as_deref(),
                args.format.resolve(),
            )
            .await?;
        },
        Commands::Identify(args) => {
            commands::identify_page(
                config,
                &args.path,
                args.title.as_deref(),
                args.format.resolve(),
            )?;
        },
        Commands::Cache { command } => match command {
            CacheCommands::List { format } => {
                commands::list_entries(config, format.resolve())?;
            },
            CacheCommands::Clear => commands::clear_cache(config, quiet)?,
            CacheCommands::Status { format } => {
                commands::show_status(config, format.resolve())?;
            },
        },
        Commands::Sync(args) => {
            commands::sync_links(config, &args.docs_dir, args.dry_run, args.format.resolve())
                .await?;
        },
    }
    Ok(())
}
