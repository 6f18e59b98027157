use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::models::{CanonicalKey, ResolvedRecord};

/// Lifetime of a cached resolution.
pub const CACHE_TTL: Duration = Duration::hours(1);

/// Immutable once inserted; replaced wholesale by a later `put`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CanonicalKey,
    pub record: ResolvedRecord,
    pub inserted_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    /// Live strictly before `inserted_at + ttl`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.inserted_at + self.ttl
    }
}

/// Memoized resolutions keyed by canonical key, with secondary aliases
/// (slug, condition id, token id, raw input, …) pointing at those keys.
///
/// Expiry is checked lazily on read. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct ResultCache {
    inner: Arc<RwLock<CacheInner>>,
    ttl: Duration,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<CanonicalKey, CacheEntry>,
    aliases: HashMap<String, CanonicalKey>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner::default())),
            ttl: CACHE_TTL,
        }
    }

    /// Look up a record by alias (any identifier registered for it).
    pub async fn get(&self, alias: &str) -> Option<ResolvedRecord> {
        self.get_at(alias, Utc::now()).await
    }

    pub async fn get_at(&self, alias: &str, now: DateTime<Utc>) -> Option<ResolvedRecord> {
        let inner = self.inner.read().await;
        let key = inner.aliases.get(alias)?;
        inner
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.record.clone())
    }

    pub async fn get_canonical(&self, key: &CanonicalKey) -> Option<ResolvedRecord> {
        self.get_canonical_at(key, Utc::now()).await
    }

    pub async fn get_canonical_at(
        &self,
        key: &CanonicalKey,
        now: DateTime<Utc>,
    ) -> Option<ResolvedRecord> {
        self.entry_at(key, now).await.map(|entry| entry.record)
    }

    /// Live entry for `key`, including when it was inserted.
    pub async fn entry(&self, key: &CanonicalKey) -> Option<CacheEntry> {
        self.entry_at(key, Utc::now()).await
    }

    pub async fn entry_at(&self, key: &CanonicalKey, now: DateTime<Utc>) -> Option<CacheEntry> {
        let inner = self.inner.read().await;
        inner.entries.get(key).filter(|entry| entry.is_live(now)).cloned()
    }

    /// Insert or overwrite the entry for `key` (last write wins) and point
    /// each alias at it.
    pub async fn put<I, S>(&self, key: CanonicalKey, record: ResolvedRecord, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.put_at(key, record, aliases, Utc::now()).await
    }

    pub async fn put_at<I, S>(
        &self,
        key: CanonicalKey,
        record: ResolvedRecord,
        aliases: I,
        now: DateTime<Utc>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = self.inner.write().await;

        inner.entries.retain(|_, entry| entry.is_live(now));
        let CacheInner { entries, aliases: alias_map } = &mut *inner;
        alias_map.retain(|_, target| entries.contains_key(target));

        entries.insert(
            key,
            CacheEntry {
                key,
                record,
                inserted_at: now,
                ttl: self.ttl,
            },
        );
        for alias in aliases {
            alias_map.insert(alias.into(), key);
        }
    }

    /// Drop every entry and alias. Returns the number of entries removed.
    pub async fn clear(&self) -> usize {
        let mut inner = self.inner.write().await;
        let cleared = inner.entries.len();
        inner.entries.clear();
        inner.aliases.clear();
        cleared
    }

    /// Live entries.
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        let inner = self.inner.read().await;
        inner.entries.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
