//! TTL-bounded discussion cache.
//!
//! Entries live in a [`KeyValueStore`] under `key_prefix + identifier`. One
//! extra key holds the generation timestamp, refreshed on every write. The
//! whole namespace expires together: once the generation is older than the
//! TTL, [`CacheStore::purge`] must run before anything else is read.
//!
//! Stored values are small JSON records compatible with what the site's
//! browser script writes:
//!
//! ```json
//! {"url": "https://github.com/o/r/discussions/87", "writtenAt": 1747000000000}
//! {"noDiscussion": true, "writtenAt": 1747000000000}
//! ```
//!
//! A value that does not parse is a miss, never a match.

use crate::config::CacheConfig;
use crate::store::KeyValueStore;
use crate::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Source of the current time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// One cached resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Identifier the entry is keyed by.
    pub identifier: String,
    /// Discussion URL, or `None` when no discussion exists.
    pub url: Option<String>,
    /// When the entry was written, if recorded.
    pub written_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Returns true when the entry records a confirmed absence.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.url.is_none()
    }
}

/// Cache operations the resolver relies on.
pub trait CacheStore {
    /// Look up an identifier. Read or parse failures are misses.
    fn lookup(&self, identifier: &str) -> Option<CacheEntry>;

    /// Record an outcome for an identifier; `None` records a confirmed absence.
    /// Also refreshes the shared generation timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn write(&mut self, identifier: &str, url: Option<&str>) -> Result<()>;

    /// True when no generation timestamp exists or it is older than the TTL.
    fn is_expired(&self) -> bool;

    /// Remove every entry in the namespace and the generation timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn purge(&mut self) -> Result<()>;

    /// Every readable entry in the namespace.
    fn entries(&self) -> Vec<CacheEntry>;

    /// Time of the last write, if any.
    fn generation(&self) -> Option<DateTime<Utc>>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    no_discussion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    written_at: Option<i64>,
}

/// [`CacheStore`] over any [`KeyValueStore`], with a configurable key namespace.
#[derive(Debug)]
pub struct NamespacedCache<S, C = SystemClock> {
    store: S,
    clock: C,
    settings: CacheConfig,
}

impl<S: KeyValueStore> NamespacedCache<S, SystemClock> {
    /// Create a cache using the system clock.
    pub const fn new(store: S, settings: CacheConfig) -> Self {
        Self {
            store,
            clock: SystemClock,
            settings,
        }
    }
}

impl<S: KeyValueStore, C: Clock> NamespacedCache<S, C> {
    /// Create a cache with an explicit clock.
    pub const fn with_clock(store: S, settings: CacheConfig, clock: C) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn entry_key(&self, identifier: &str) -> String {
        format!("{}{identifier}", self.settings.key_prefix)
    }

    fn is_entry_key(&self, key: &str) -> bool {
        key.starts_with(&self.settings.key_prefix) && key != self.settings.timestamp_key
    }

    fn read_entry(&self, identifier: &str) -> Result<Option<CacheEntry>> {
        let Some(raw) = self.store.get(&self.entry_key(identifier))? else {
            return Ok(None);
        };
        let stored: StoredValue = serde_json::from_str(&raw)?;
        let written_at = stored.written_at.and_then(from_millis);

        match (stored.url, stored.no_discussion) {
            (Some(url), _) if !url.trim().is_empty() => Ok(Some(CacheEntry {
                identifier: identifier.to_string(),
                url: Some(url),
                written_at,
            })),
            (_, true) => Ok(Some(CacheEntry {
                identifier: identifier.to_string(),
                url: None,
                written_at,
            })),
            _ => Err(Error::Serialization(format!(
                "cache value for '{identifier}' has neither url nor noDiscussion"
            ))),
        }
    }
}

impl<S: KeyValueStore, C: Clock> CacheStore for NamespacedCache<S, C> {
    fn lookup(&self, identifier: &str) -> Option<CacheEntry> {
        match self.read_entry(identifier) {
            Ok(entry) => {
                debug!(
                    "Cache {} for '{}'",
                    if entry.is_some() { "hit" } else { "miss" },
                    identifier
                );
                entry
            },
            Err(e) => {
                warn!("Treating unreadable cache entry for '{}' as a miss: {}", identifier, e);
                None
            },
        }
    }

    fn write(&mut self, identifier: &str, url: Option<&str>) -> Result<()> {
        let now = self.clock.now().timestamp_millis();
        let value = StoredValue {
            url: url.map(str::to_string),
            no_discussion: url.is_none(),
            written_at: Some(now),
        };
        let json = serde_json::to_string(&value)?;

        self.store.set(&self.entry_key(identifier), &json)?;
        self.store
            .set(&self.settings.timestamp_key, &now.to_string())?;
        info!(
            "Cached {} for '{}'",
            url.unwrap_or("confirmed absence"),
            identifier
        );
        Ok(())
    }

    fn is_expired(&self) -> bool {
        self.generation()
            .is_none_or(|written| self.clock.now() - written >= self.settings.ttl())
    }

    fn purge(&mut self) -> Result<()> {
        let keys: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|k| self.is_entry_key(k))
            .collect();
        for key in &keys {
            self.store.remove(key)?;
        }
        self.store.remove(&self.settings.timestamp_key)?;
        info!("Purged {} cached discussion entries", keys.len());
        Ok(())
    }

    fn entries(&self) -> Vec<CacheEntry> {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to list cache keys: {}", e);
                return Vec::new();
            },
        };
        keys.iter()
            .filter(|k| self.is_entry_key(k))
            .filter_map(|k| k.strip_prefix(&self.settings.key_prefix))
            .filter_map(|identifier| self.lookup(identifier))
            .collect()
    }

    fn generation(&self) -> Option<DateTime<Utc>> {
        let raw = match self.store.get(&self.settings.timestamp_key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read cache generation: {}", e);
                return None;
            },
        };
        raw.trim().parse::<i64>().ok().and_then(from_millis)
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
