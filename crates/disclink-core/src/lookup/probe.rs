//! Numbered-probe strategy.
//!
//! Fetches a fixed list of thread numbers one at a time and stops at the
//! first discussion whose title matches. The list only covers a window of
//! recent threads, so this is a degraded fallback for when the listing is
//! unavailable.

use super::matching::exact_title_match;
use crate::host::DiscussionHost;
use crate::types::{DiscussionMatch, PageContext, Strategy};
use crate::{Error, Result};
use tracing::{debug, info, instrument, warn};

/// Probe `numbers` in order.
///
/// A missing thread is skipped. Any other per-thread failure is logged and
/// skipped too, unless every probe failed, in which case the last error is
/// returned so the chain treats the whole strategy as failed.
///
/// # Errors
///
/// - [`Error::RateLimited`] as soon as any probe is refused
/// - the last per-thread error when no probe produced a usable answer
/// - [`Error::Config`] when `numbers` is empty
#[instrument(skip(host, page, numbers), fields(identifier = %page.identifier))]
pub async fn run<H: DiscussionHost + ?Sized>(
    host: &H,
    page: &PageContext,
    numbers: &[u64],
) -> Result<Option<DiscussionMatch>> {
    if numbers.is_empty() {
        return Err(Error::Config("lookup.probe_numbers is empty".into()));
    }

    let mut failures = 0usize;
    let mut last_error = None;

    for &number in numbers {
        let thread = match host.fetch_thread(number).await {
            Ok(thread) => thread,
            Err(e) if e.is_rate_limited() => return Err(e),
            Err(Error::NotFound(_)) => {
                debug!("Thread #{} does not exist", number);
                continue;
            },
            Err(e) => {
                warn!("Probe of thread #{} failed: {}", number, e);
                failures += 1;
                last_error = Some(e);
                continue;
            },
        };

        if !thread.is_discussion() {
            debug!("Thread #{} is not a discussion", number);
            continue;
        }

        if let Some(via) = exact_title_match(page, &thread.title) {
            info!("Matched discussion #{} '{}' via {:?}", number, thread.title, via);
            return Ok(Some(DiscussionMatch {
                url: thread.html_url,
                title: thread.title,
                matched_via: via,
                source: Strategy::Probe,
            }));
        }
        debug!("Discussion #{} '{}' does not match", number, thread.title);
    }

    match last_error {
        Some(e) if failures == numbers.len() => Err(e),
        _ => Ok(None),
    }
}
