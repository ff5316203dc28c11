//! Command implementations.

mod cache;
mod identify;
mod resolve;
mod sync;

pub use cache::{CacheStatus, clear_cache, list_entries, show_status};
pub use identify::identify_page;
pub use resolve::resolve_page;
pub use sync::sync_links;

use anyhow::{Result, anyhow};

use crate::error::CliError;
use crate::output::OutputFormat;

/// Reject `html` for commands that have no markup to show.
fn require_data_format(format: OutputFormat, command: &str) -> Result<OutputFormat> {
    if format == OutputFormat::Html {
        return Err(CliError::usage(anyhow!(
            "invalid value 'html' for --format: `{command}` supports text or json"
        ))
        .into());
    }
    Ok(format)
}
