//! Bulk-listing strategy: one request, matched in memory.

use super::matching::find_exact;
use crate::host::DiscussionHost;
use crate::types::{DiscussionMatch, DiscussionSummary, PageContext, Strategy};
use crate::Result;
use tracing::{debug, info, instrument};

/// Match the page against the most recently updated discussions.
///
/// # Errors
///
/// Propagates host errors unchanged; the chain decides whether they end the
/// resolution or only this strategy.
#[instrument(skip(host, page), fields(identifier = %page.identifier))]
pub async fn run<H: DiscussionHost + ?Sized>(
    host: &H,
    page: &PageContext,
    page_size: u32,
) -> Result<Option<DiscussionMatch>> {
    let listing = host.list_discussions(page_size, None).await?;
    debug!("Listing returned {} discussions", listing.discussions.len());

    Ok(find_exact(page, &listing.discussions).map(|(found, via)| {
        info!("Matched '{}' via {:?}", found.title, via);
        DiscussionMatch {
            url: found.url.clone(),
            title: found.title.clone(),
            matched_via: via,
            source: Strategy::Listing,
        }
    }))
}

/// Fetch every discussion by following the listing cursor.
///
/// # Errors
///
/// Returns the first host error; partial results are discarded.
pub async fn fetch_all<H: DiscussionHost + ?Sized>(
    host: &H,
    page_size: u32,
) -> Result<Vec<DiscussionSummary>> {
    let mut all = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = host.list_discussions(page_size, cursor.as_deref()).await?;
        all.extend(page.discussions);
        debug!("Fetched {} discussions so far", all.len());

        match page.next_cursor {
            Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
            _ => break,
        }
    }

    Ok(all)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::testing::{Reply, ScriptedHost, discussion, page_of};
    use crate::types::MatchedVia;

    fn experiment_page() -> PageContext {
        PageContext {
            path: "experiments/allen_institute/slap2/allen_institute_787727_2025-03-27".into(),
            identifier: "allen_institute_787727_2025-03-27".into(),
            alternate_identifiers: Vec::new(),
            title: "allen_institute_787727_2025-03-27".into(),
        }
    }

    #[tokio::test]
    async fn test_listing_finds_exact_title() {
        let host = ScriptedHost {
            pages: vec![Reply::Ok(page_of(
                vec![
                    discussion("General questions", 3),
                    discussion("Discussion: allen_institute_787727_2025-03-27", 12),
                ],
                None,
            ))],
            ..ScriptedHost::default()
        };

        let found = run(&host, &experiment_page(), 100).await.unwrap().unwrap();
        assert_eq!(found.url, "https://github.com/acme/docs/discussions/12");
        assert_eq!(found.matched_via, MatchedVia::Exact);
        assert_eq!(found.source, Strategy::Listing);
        assert_eq!(host.calls(), vec!["list:100:-"]);
    }

    #[tokio::test]
    async fn test_listing_does_not_accept_substrings() {
        let host = ScriptedHost {
            pages: vec![Reply::Ok(page_of(
                vec![discussion("Discussion: allen_institute_787727_2025-03-27 follow-up", 4)],
                None,
            ))],
            ..ScriptedHost::default()
        };
        assert!(run(&host, &experiment_page(), 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing_propagates_rate_limit() {
        let host = ScriptedHost {
            pages: vec![Reply::RateLimited],
            ..ScriptedHost::default()
        };
        let err = run(&host, &experiment_page(), 100).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_fetch_all_follows_cursor() {
        let host = ScriptedHost {
            pages: vec![
                Reply::Ok(page_of(vec![discussion("a", 1)], Some("c1"))),
                Reply::Ok(page_of(vec![discussion("b", 2)], None)),
            ],
            ..ScriptedHost::default()
        };
        let all = fetch_all(&host, 50).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(host.calls(), vec!["list:50:-", "list:50:c1"]);
    }

    #[tokio::test]
    async fn test_fetch_all_fails_on_any_page_error() {
        let host = ScriptedHost {
            pages: vec![
                Reply::Ok(page_of(vec![discussion("a", 1)], Some("c1"))),
                Reply::Fail,
            ],
            ..ScriptedHost::default()
        };
        assert!(fetch_all(&host, 50).await.is_err());
    }
}
