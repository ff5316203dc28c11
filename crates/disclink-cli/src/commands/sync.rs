use anyhow::{Result, anyhow};
use disclink_core::{Config, GitHubClient, LinkRenderer, LinkSyncer, PageIdentifierResolver};
use std::path::Path;

use crate::error::{CliError, ErrorCategory};
use crate::output::OutputFormat;
use crate::output::json::print_json;
use crate::output::text::format_sync_report;

/// Sync discussion link blocks into the markdown files under `docs_dir`.
///
/// The report is always printed; files that could not be updated turn the
/// run into a failure afterwards.
pub async fn sync_links(
    config: &Config,
    docs_dir: &Path,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let format = super::require_data_format(format, "sync")?;
    let host = GitHubClient::new(&config.repository, &config.lookup).map_err(CliError::from)?;
    let syncer = LinkSyncer::new(
        &host,
        PageIdentifierResolver::new(config.site.clone()),
        LinkRenderer::new(config.repository.clone()),
        config.lookup.effective_page_size(),
    );

    let report = syncer
        .sync(docs_dir, dry_run)
        .await
        .map_err(CliError::from)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        _ => print!("{}", format_sync_report(&report)),
    }

    let failed = report.failed();
    if failed > 0 {
        return Err(CliError::new(
            ErrorCategory::Internal,
            anyhow!("{failed} of {} files could not be synced", report.total()),
        )
        .into());
    }
    Ok(())
}
