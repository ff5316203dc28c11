//! Search-query strategy.
//!
//! Issues progressively looser title searches and stops at the first query
//! whose results contain any discussion. Only that query's discussions are
//! ranked; if none of them qualifies the strategy finds nothing.

use super::matching::find_ranked;
use crate::host::DiscussionHost;
use crate::types::{DiscussionMatch, DiscussionSummary, PageContext, Strategy, discussion_title};
use crate::Result;
use tracing::{debug, info, instrument};

/// Search queries for a page, most specific first, without duplicates.
///
/// For the primary identifier and then each alternate: the prefixed title,
/// the prefixed full path, the bare identifier and the page title.
#[must_use]
pub fn build_queries(page: &PageContext, repository_slug: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for identifier in page.identifiers() {
        for term in [
            discussion_title(identifier),
            discussion_title(&page.path),
            identifier.to_string(),
            page.title.clone(),
        ] {
            let term = term.replace('"', "").trim().to_string();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
    }

    terms
        .into_iter()
        .map(|term| format!("\"{term}\" in:title is:discussion repo:{repository_slug}"))
        .collect()
}

/// Run the queries in order until one returns discussions, then rank those.
///
/// # Errors
///
/// Any failed query ends the strategy with that error.
#[instrument(skip(host, page), fields(identifier = %page.identifier))]
pub async fn run<H: DiscussionHost + ?Sized>(
    host: &H,
    page: &PageContext,
    repository_slug: &str,
) -> Result<Option<DiscussionMatch>> {
    for query in build_queries(page, repository_slug) {
        let items = host.search(&query).await?;
        let discussions: Vec<DiscussionSummary> = items
            .into_iter()
            .filter(|item| item.is_discussion())
            .map(DiscussionSummary::from)
            .collect();
        debug!("Query {:?} returned {} discussions", query, discussions.len());
        if discussions.is_empty() {
            continue;
        }

        let Some((found, via)) = find_ranked(page, &discussions) else {
            debug!("No result of query {:?} qualifies", query);
            return Ok(None);
        };
        info!("Matched '{}' via {:?} with query {:?}", found.title, via, query);
        return Ok(Some(DiscussionMatch {
            url: found.url.clone(),
            title: found.title.clone(),
            matched_via: via,
            source: Strategy::Search,
        }));
    }
    Ok(None)
}
