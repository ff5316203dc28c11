//! # CLI Structure and Argument Parsing
//!
//! Command-line interface for `disclink`, built with `clap` derive macros.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Which discussion belongs to this page?
//! disclink resolve /meetings/2025-05-13/ --title "May 13 Meeting"
//!
//! # The markup a page would show
//! disclink resolve /hardware.html -f html
//!
//! # Identifier derivation only, no network
//! disclink identify /experiments/allen_institute/slap2/allen_institute_787727_2025-03-27/
//!
//! # Cache housekeeping
//! disclink cache status
//! disclink cache clear
//!
//! # Write link blocks into markdown sources
//! disclink sync --docs-dir docs --dry-run
//! ```
//!
//! ## Output Formats
//!
//! - **text**: Human-readable output (default on a terminal)
//! - **json**: Machine-readable JSON (default when piped)
//! - **html**: The rendered link markup (`resolve` only)

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::utils::cli_args::FormatArg;

/// Main CLI structure for the `disclink` command
#[derive(Parser, Clone, Debug)]
#[command(name = "disclink")]
#[command(version)]
#[command(about = "disclink - link documentation pages to their GitHub discussions", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "DISCLINK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Output format the selected command will use.
    pub fn output_format(&self) -> OutputFormat {
        let format = match &self.command {
            Commands::Resolve(args) => &args.format,
            Commands::Identify(args) => &args.format,
            Commands::Sync(args) => &args.format,
            Commands::Cache {
                command: CacheCommands::List { format } | CacheCommands::Status { format },
            } => format,
            Commands::Cache {
                command: CacheCommands::Clear,
            } => return OutputFormat::Text,
        };
        format.resolve()
    }
}

/// Top-level subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Resolve a page to its discussion, a new-discussion form, or the
    /// discussions index when rate limited
    Resolve(ResolveArgs),

    /// Show the identifiers derived for a page without any network access
    Identify(IdentifyArgs),

    /// Inspect or clear the discussion cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Insert or refresh discussion link blocks in markdown sources
    Sync(SyncArgs),
}

/// Arguments for `disclink resolve`
#[derive(Args, Clone, Debug)]
pub struct ResolveArgs {
    /// Page location, e.g. `/meetings/2025-05-13/` or a full URL
    pub path: String,

    /// Page title as shown in the browser tab
    #[arg(long)]
    pub title: Option<String>,

    /// Skip the persistent cache for this lookup
    #[arg(long)]
    pub no_cache: bool,

    /// HTML page body to append the link block to, once
    #[arg(long, value_name = "FILE")]
    pub content: Option<PathBuf>,

    #[command(flatten)]
    pub format: FormatArg,
}

/// Arguments for `disclink identify`
#[derive(Args, Clone, Debug)]
pub struct IdentifyArgs {
    /// Page location, e.g. `/meetings/2025-05-13/` or a full URL
    pub path: String,

    /// Page title as shown in the browser tab
    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub format: FormatArg,
}

/// Subcommands of `disclink cache`
#[derive(Subcommand, Clone, Debug)]
pub enum CacheCommands {
    /// List cached outcomes
    List {
        #[command(flatten)]
        format: FormatArg,
    },
    /// Remove every cached outcome
    Clear,
    /// Show cache location, age and size
    Status {
        #[command(flatten)]
        format: FormatArg,
    },
}

/// Arguments for `disclink sync`
#[derive(Args, Clone, Debug)]
pub struct SyncArgs {
    /// Directory of markdown sources
    #[arg(long, default_value = "docs", value_name = "DIR")]
    pub docs_dir: PathBuf,

    /// Report what would change without writing files
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub format: FormatArg,
}
