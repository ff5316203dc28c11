use anyhow::{Context, Result};
use disclink_core::{
    Config, ContentArea, GitHubClient, LinkRenderer, LookupChain, Outcome,
    PageIdentifierResolver, Resolver,
};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{CliError, ErrorCategory};
use crate::output::OutputFormat;
use crate::output::json::{ResolveOutput, print_json};
use crate::output::text::{format_content_update, format_resolution};
use crate::utils::store::lookup_cache;

/// Resolve one page and print its link.
///
/// With `content`, the link block is also appended to that HTML body unless
/// it already carries one. A rate-limited lookup is a normal outcome and
/// exits successfully.
pub async fn resolve_page(
    config: &Config,
    location: &str,
    title: Option<&str>,
    no_cache: bool,
    content: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut area = content.map(read_content).transpose()?;

    let page = PageIdentifierResolver::new(config.site.clone()).resolve(location, title);
    let host = GitHubClient::new(&config.repository, &config.lookup).map_err(CliError::from)?;
    let chain = LookupChain::from_config(&config.lookup, &config.repository);
    let mut cache = lookup_cache(config, no_cache);

    let resolution = Resolver::new(&host, chain)
        .resolve(&page, cache.as_mut())
        .await;
    let link = resolution.link(&LinkRenderer::new(config.repository.clone()));

    match &resolution.outcome {
        Outcome::RateLimited => warn!("GitHub rate limit reached; linking to all discussions"),
        outcome => info!("Resolved '{}' to {:?}", page.identifier, outcome),
    }

    let content_updated = match (content, area.as_mut()) {
        (Some(path), Some(area)) => {
            let appended = area.append_link(&link);
            if appended {
                fs::write(path, area.as_html())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Appended discussion link to {}", path.display());
            } else {
                info!("{} already carries a discussion link", path.display());
            }
            Some(appended)
        },
        _ => None,
    };

    match format {
        OutputFormat::Text => {
            print!("{}", format_resolution(&resolution, &link));
            if let (Some(path), Some(updated)) = (content, content_updated) {
                print!("{}", format_content_update(path, updated));
            }
        },
        OutputFormat::Json => print_json(&ResolveOutput {
            resolution: &resolution,
            link: &link,
            content_updated,
        })?,
        OutputFormat::Html => println!("{}", link.to_html()),
    }
    Ok(())
}

fn read_content(path: &Path) -> Result<ContentArea> {
    let html = fs::read_to_string(path).map_err(|err| {
        let category = if err.kind() == std::io::ErrorKind::NotFound {
            ErrorCategory::NotFound
        } else {
            ErrorCategory::Internal
        };
        CliError::new(
            category,
            anyhow::Error::new(err).context(format!("Failed to read {}", path.display())),
        )
    })?;
    Ok(ContentArea::new(html))
}
