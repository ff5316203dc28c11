//! Discussion lookup chain.
//!
//! Strategies run strictly one after another, each fully awaited before the
//! next starts, so a single resolution never spends more of the shared
//! anonymous request budget than it has to. The driver is a plain loop:
//!
//! - a match ends the chain
//! - a rate-limited answer ends the chain with nothing cached
//! - a strategy failure or an empty result moves on to the next strategy
//!
//! When every strategy has run without a match the page has no discussion.
//! That absence is only *confirmed* (and therefore cacheable) if at least one
//! strategy actually completed its search.

pub mod listing;
pub mod matching;
pub mod probe;
pub mod search;

use crate::config::{LookupConfig, RepositoryConfig};
use crate::host::DiscussionHost;
use crate::types::{DiscussionMatch, PageContext, Strategy};
use crate::Result;
use tracing::{debug, instrument, warn};

/// Result of running the whole chain for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// A strategy found the page's discussion.
    Found(DiscussionMatch),
    /// No strategy found a discussion.
    NoDiscussion {
        /// True when at least one strategy completed without error.
        confirmed: bool,
    },
    /// The host refused a request; the outcome is unknown.
    RateLimited {
        /// Strategy that hit the limit.
        strategy: Strategy,
    },
}

/// Ordered set of lookup strategies.
#[derive(Debug, Clone)]
pub struct LookupChain {
    strategies: Vec<Strategy>,
    page_size: u32,
    probe_numbers: Vec<u64>,
    repository_slug: String,
}

impl LookupChain {
    /// Build the chain described by the configuration.
    #[must_use]
    pub fn from_config(lookup: &LookupConfig, repository: &RepositoryConfig) -> Self {
        Self {
            strategies: lookup.strategies.clone(),
            page_size: lookup.effective_page_size(),
            probe_numbers: lookup.probe_numbers.clone(),
            repository_slug: repository.slug(),
        }
    }

    /// Strategies in execution order.
    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Run every strategy in order until one decides the outcome.
    #[instrument(skip(self, host, page), fields(identifier = %page.identifier))]
    pub async fn run<H: DiscussionHost + ?Sized>(&self, host: &H, page: &PageContext) -> ChainOutcome {
        let mut completed = false;

        for &strategy in &self.strategies {
            debug!("Trying {} strategy", strategy);
            match self.run_strategy(strategy, host, page).await {
                Ok(Some(found)) => return ChainOutcome::Found(found),
                Ok(None) => {
                    debug!("{} strategy found no match", strategy);
                    completed = true;
                },
                Err(e) if e.is_rate_limited() => {
                    warn!("Rate limited during {} strategy: {}", strategy, e);
                    return ChainOutcome::RateLimited { strategy };
                },
                Err(e) => {
                    warn!("{} strategy failed, trying the next one: {}", strategy, e);
                },
            }
        }

        ChainOutcome::NoDiscussion {
            confirmed: completed,
        }
    }

    async fn run_strategy<H: DiscussionHost + ?Sized>(
        &self,
        strategy: Strategy,
        host: &H,
        page: &PageContext,
    ) -> Result<Option<DiscussionMatch>> {
        match strategy {
            Strategy::Listing => listing::run(host, page, self.page_size).await,
            Strategy::Probe => probe::run(host, page, &self.probe_numbers).await,
            Strategy::Search => search::run(host, page, &self.repository_slug).await,
        }
    }
}
