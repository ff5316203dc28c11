//! Cache construction for commands.

use anyhow::{Context, Result};
use disclink_core::{CacheStore, Config, FileStore, MemoryStore, NamespacedCache};
use tracing::warn;

use crate::error::CliError;

/// Open the persistent cache in the configured data directory.
pub fn open_cache(config: &Config) -> Result<NamespacedCache<FileStore>> {
    let dir = Config::data_dir().map_err(CliError::from)?;
    let store = FileStore::open(&dir)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to open cache in {}", dir.display()))?;
    Ok(NamespacedCache::new(store, config.cache.clone()))
}

/// The cache a lookup should use: persistent, or an empty in-memory one.
///
/// A persistent cache that cannot be opened degrades to memory so the lookup
/// still ends with a link.
pub fn lookup_cache(config: &Config, no_cache: bool) -> Box<dyn CacheStore> {
    if no_cache {
        return memory_cache(config);
    }
    match open_cache(config) {
        Ok(cache) => Box::new(cache),
        Err(err) => {
            warn!("Cache unavailable, continuing without it: {err:#}");
            memory_cache(config)
        },
    }
}

fn memory_cache(config: &Config) -> Box<dyn CacheStore> {
    Box::new(NamespacedCache::new(MemoryStore::new(), config.cache.clone()))
}
