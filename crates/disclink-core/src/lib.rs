//! # disclink-core
//!
//! Resolves documentation pages to their GitHub discussion threads.
//!
//! Given a page path, the engine derives a stable identifier, checks a
//! TTL-bounded cache, and otherwise runs an ordered chain of lookup
//! strategies against anonymous API endpoints. Every resolution ends in one
//! of three links: the existing discussion, a pre-filled "start a discussion"
//! form, or a browse-all page when the API rate limit was hit.
//!
//! ## Architecture
//!
//! - **Page identifiers** ([`page`]): path and title normalisation
//! - **Cache** ([`cache`], [`store`]): namespaced entries over a key-value store
//! - **Host client** ([`host`], [`rate_limit`]): endpoints and status classification
//! - **Lookup chain** ([`lookup`]): listing, numbered probe and search strategies
//! - **Rendering** ([`render`]): the three link outcomes as HTML
//! - **Resolution** ([`resolver`]): cache first, then the chain
//! - **Sync** ([`sync`]): write links into markdown sources
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use disclink_core::{
//!     Config, FileStore, GitHubClient, LinkRenderer, LookupChain, NamespacedCache,
//!     PageIdentifierResolver, Resolver,
//! };
//!
//! # async fn run() -> disclink_core::Result<()> {
//! let config = Config::load(None)?;
//! let page = PageIdentifierResolver::new(config.site.clone())
//!     .resolve("/meetings/2025-05-13/", Some("May 13 Meeting"));
//!
//! let host = GitHubClient::new(&config.repository, &config.lookup)?;
//! let chain = LookupChain::from_config(&config.lookup, &config.repository);
//! let mut cache = NamespacedCache::new(FileStore::open(&Config::data_dir()?)?, config.cache.clone());
//!
//! let resolution = Resolver::new(&host, chain).resolve(&page, &mut cache).await;
//! let link = resolution.link(&LinkRenderer::new(config.repository.clone()));
//! println!("{}", link.to_html());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`]. Resolution itself never
//! fails; host and storage errors degrade to one of the rendered outcomes.

/// TTL-bounded discussion cache
pub mod cache;
/// Configuration loading and validation
pub mod config;
/// Error types and result aliases
pub mod error;
/// Collaboration host client
pub mod host;
/// Lookup strategies and the chain driver
pub mod lookup;
/// Page identifier derivation
pub mod page;
/// Response status classification
pub mod rate_limit;
/// Link rendering
pub mod render;
/// Resolution entry point
pub mod resolver;
/// Key-value storage backends
pub mod store;
/// Markdown link synchronisation
pub mod sync;
/// Shared data types
pub mod types;

#[cfg(test)]
mod testing;

pub use cache::{CacheEntry, CacheStore, Clock, FixedClock, NamespacedCache, SystemClock};
pub use config::{CacheConfig, Config, LookupConfig, RepositoryConfig, SiteConfig};
pub use error::{Error, Result};
pub use host::{DiscussionHost, DiscussionPage, GitHubClient, SearchItem, ThreadItem};
pub use lookup::{ChainOutcome, LookupChain};
pub use page::PageIdentifierResolver;
pub use rate_limit::{RateLimitGuard, ResponseClass};
pub use render::{ContentArea, LinkKind, LinkRenderer, RenderedLink};
pub use resolver::{Origin, Outcome, Resolution, Resolver};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use sync::{FileAction, FileReport, LinkSyncer, SyncReport};
pub use types::*;
