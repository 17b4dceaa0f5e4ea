//! Short-lived in-memory response cache.
//!
//! Entries expire lazily: an entry older than the TTL is treated as absent on
//! lookup and is only replaced by the next successful fetch for its key.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Source of the current time for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Endpoint path plus its serialized query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn new(endpoint: &str, query: Option<&str>) -> Self {
        match query {
            Some(q) if !q.is_empty() => Self(format!("{endpoint}?{q}")),
            _ => Self(endpoint.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

pub struct ResponseCache<V> {
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResponseCache<V> {
    #[must_use]
    pub fn new(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the value stored under `key` if it is still live.
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        let age = self.clock.now() - entry.stored_at;
        if age < self.ttl {
            Some(entry.value.clone())
        } else {
            debug!(key = %key, age_secs = age.num_seconds(), "Cache entry expired");
            None
        }
    }

    /// Stores `value` under `key`, replacing whatever was there.
    pub async fn insert(&self, key: CacheKey, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries.write().await.insert(key, entry);
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        debug!(count = entries.len(), "Clearing response cache");
        entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
