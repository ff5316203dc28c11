//! Resolution entry point: cache first, then the lookup chain.
//!
//! ```text
//! PageContext ──► expired? ──yes──► purge
//!                    │
//!                    ▼
//!              cache lookup ──hit──► Resolution (origin = cache)
//!                    │ miss
//!                    ▼
//!              LookupChain ──► Found / NoDiscussion / RateLimited
//!                    │
//!                    ▼
//!   cache write (skipped when rate limited or absence is unconfirmed)
//! ```
//!
//! Resolution never fails. Storage problems degrade to a fresh lookup and
//! host problems degrade to one of the three rendered outcomes.

use crate::cache::CacheStore;
use crate::host::DiscussionHost;
use crate::lookup::{ChainOutcome, LookupChain};
use crate::render::{LinkRenderer, RenderedLink};
use crate::types::{DiscussionMatch, PageContext};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// What is known about a page's discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The discussion exists.
    Existing {
        /// Discussion URL.
        url: String,
    },
    /// No discussion exists yet.
    NoDiscussion,
    /// The host refused to answer; the outcome is unknown.
    RateLimited,
}

/// Where an outcome came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// A live cache entry.
    Cache,
    /// The lookup chain.
    Lookup,
}

/// Result of resolving one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Page that was resolved.
    pub page: PageContext,
    /// Resolved outcome.
    pub outcome: Outcome,
    /// Where the outcome came from.
    pub origin: Origin,
    /// Match details when a strategy found the discussion this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<DiscussionMatch>,
    /// True when this resolution wrote a cache entry.
    pub cache_written: bool,
}

impl Resolution {
    /// Render the link shown for this resolution.
    #[must_use]
    pub fn link(&self, renderer: &LinkRenderer) -> RenderedLink {
        match &self.outcome {
            Outcome::Existing { url } => renderer.existing(url),
            Outcome::NoDiscussion => renderer.create_new(&self.page.identifier),
            Outcome::RateLimited => renderer.rate_limited(),
        }
    }
}

/// Resolves pages against a cache and a discussion host.
#[derive(Debug)]
pub struct Resolver<'a, H: ?Sized> {
    host: &'a H,
    chain: LookupChain,
}

impl<'a, H: DiscussionHost + ?Sized> Resolver<'a, H> {
    /// Create a resolver.
    pub const fn new(host: &'a H, chain: LookupChain) -> Self {
        Self { host, chain }
    }

    /// Resolve a page.
    ///
    /// An expired cache is purged before it is read. A cache hit (discussion
    /// or confirmed absence) returns without touching the host.
    #[instrument(skip(self, page, cache), fields(identifier = %page.identifier))]
    pub async fn resolve<C: CacheStore + ?Sized>(
        &self,
        page: &PageContext,
        cache: &mut C,
    ) -> Resolution {
        let cache_readable = if cache.is_expired() {
            debug!("Cache generation expired, purging");
            match cache.purge() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to purge expired cache, bypassing it: {}", e);
                    false
                },
            }
        } else {
            true
        };

        if cache_readable {
            if let Some(entry) = cache.lookup(&page.identifier) {
                let outcome = match entry.url {
                    Some(url) => Outcome::Existing { url },
                    None => Outcome::NoDiscussion,
                };
                debug!("Resolved from cache: {:?}", outcome);
                return Resolution {
                    page: page.clone(),
                    outcome,
                    origin: Origin::Cache,
                    matched: None,
                    cache_written: false,
                };
            }
        }

        let (outcome, matched, cacheable) = match self.chain.run(self.host, page).await {
            ChainOutcome::Found(found) => (
                Outcome::Existing {
                    url: found.url.clone(),
                },
                Some(found),
                true,
            ),
            ChainOutcome::NoDiscussion { confirmed } => {
                if !confirmed {
                    info!("No strategy completed; not caching the absence");
                }
                (Outcome::NoDiscussion, None, confirmed)
            },
            ChainOutcome::RateLimited { .. } => (Outcome::RateLimited, None, false),
        };

        let cache_written = cacheable && write_outcome(cache, &page.identifier, &outcome);

        Resolution {
            page: page.clone(),
            outcome,
            origin: Origin::Lookup,
            matched,
            cache_written,
        }
    }
}

fn write_outcome<C: CacheStore + ?Sized>(cache: &mut C, identifier: &str, outcome: &Outcome) -> bool {
    let url = match outcome {
        Outcome::Existing { url } => Some(url.as_str()),
        Outcome::NoDiscussion => None,
        Outcome::RateLimited => return false,
    };
    match cache.write(identifier, url) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to cache outcome for '{}': {}", identifier, e);
            false
        },
    }
}
