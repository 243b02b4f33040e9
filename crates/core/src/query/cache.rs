use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::key::QueryKey;
use crate::Result;

/// Entries kept before the cache starts evicting
pub const DEFAULT_CAPACITY: usize = 128;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
    /// Insertion order, used to pick eviction victims
    seq: u64,
}

/// Thread-safe in-memory cache of query results.
///
/// Holds at most `capacity` entries. When full, a new key evicts the
/// oldest stale entry, or the oldest entry if none is stale.
#[derive(Debug, Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, CacheEntry>>>,
    next_seq: Arc<AtomicU64>,
    capacity: usize,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(0)),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn entry(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    /// Cached value when present and not invalidated
    pub async fn get_fresh<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.stale => Ok(Some(serde_json::from_value(entry.value.clone())?)),
            _ => Ok(None),
        }
    }

    pub async fn put<T: Serialize>(&self, key: QueryKey, value: &T) -> Result<()> {
        let entry = CacheEntry {
            value: serde_json::to_value(value)?,
            fetched_at: Utc::now(),
            stale: false,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            evict_one(&mut entries);
        }
        entries.insert(key, entry);
        Ok(())
    }

    /// Mark every entry under `prefix` stale; returns how many were marked
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let mut marked = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) && !entry.stale {
                entry.stale = true;
                marked += 1;
            }
        }
        debug!("Invalidated {} cached queries under {}", marked, prefix);
        marked
    }

    pub async fn remove(&self, key: &QueryKey) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn evict_one(entries: &mut HashMap<QueryKey, CacheEntry>) {
    let victim = entries
        .iter()
        .min_by_key(|(_, entry)| (!entry.stale, entry.seq))
        .map(|(key, _)| key.clone());
    if let Some(key) = victim {
        entries.remove(&key);
        debug!("Evicted cached query {}", key);
    }
}
