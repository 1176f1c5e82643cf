//! Report cache over injected key-value stores.
//!
//! AI-derived report text/HTML is cached per birth fingerprint and
//! methodology, tried in a fast session tier first with fallback to a
//! slower persistent tier. The stores are injected behind a trait so
//! the core can be tested with an in-memory fake and ported to any
//! persistence backend. All traffic is best-effort: a failing store is
//! logged and never blocks or fails chart rendering.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::StoreError;
use crate::log::{debug, warn};

/// Minimal key-value store surface the cache needs.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// A cached report envelope: payload plus provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedReport {
    pub data: Value,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl CachedReport {
    pub fn new(data: Value, timestamp: impl Into<String>) -> CachedReport {
        CachedReport {
            data,
            timestamp: timestamp.into(),
            format: None,
        }
    }
}

/// Two-tier cache: a fast ephemeral store backed by a durable one.
pub struct TieredCache<F, D> {
    fast: F,
    durable: D,
}

impl<F: KeyValueStore, D: KeyValueStore> TieredCache<F, D> {
    pub fn new(fast: F, durable: D) -> TieredCache<F, D> {
        TieredCache { fast, durable }
    }

    /// Looks a report up, fast tier first. A corrupted cached entry is
    /// evicted from both tiers and treated as a miss.
    pub fn load(&self, key: &str) -> Option<CachedReport> {
        let raw = match self.fast.get(key) {
            Ok(Some(raw)) => Some(raw),
            Ok(None) => None,
            Err(err) => {
                warn!("fast tier read failed: {err}");
                None
            }
        };
        let raw = raw.or_else(|| match self.durable.get(key) {
            Ok(hit) => hit,
            Err(err) => {
                warn!("durable tier read failed: {err}");
                None
            }
        })?;

        match serde_json::from_str(&raw) {
            Ok(report) => {
                debug!("cache hit for {key}");
                Some(report)
            }
            Err(err) => {
                warn!("corrupted cache entry for {key}: {err}, evicting");
                self.invalidate(key);
                None
            }
        }
    }

    /// Writes a report to both tiers. Serialization of the envelope
    /// cannot fail; store failures are logged and swallowed.
    pub fn store(&self, key: &str, report: &CachedReport) {
        let Ok(serialized) = serde_json::to_string(report) else {
            return;
        };
        if let Err(err) = self.fast.set(key, &serialized) {
            warn!("fast tier write failed: {err}");
        }
        if let Err(err) = self.durable.set(key, &serialized) {
            warn!("durable tier write failed: {err}");
        }
    }

    /// Removes a report from both tiers.
    pub fn invalidate(&self, key: &str) {
        if let Err(err) = self.fast.remove(key) {
            warn!("fast tier remove failed: {err}");
        }
        if let Err(err) = self.durable.remove(key) {
            warn!("durable tier remove failed: {err}");
        }
    }
}

/// In-memory store for tests and non-browser embeddings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::new("get", key, "store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::new("set", key, "store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::new("remove", key, "store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Store that fails every operation, for exercising best-effort paths.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::new("get", key, "quota exceeded"))
        }
        fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::new("set", key, "quota exceeded"))
        }
        fn remove(&self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::new("remove", key, "quota exceeded"))
        }
    }

    #[test]
    fn store_then_load_round_trips_through_fast_tier() {
        let cache = TieredCache::new(MemoryStore::new(), MemoryStore::new());
        let report = CachedReport::new(json!({"summary": "strong lagna"}), "2024-06-01T10:00:00Z");
        cache.store("ai_overview_A_B_C_D_parashara", &report);
        let loaded = cache.load("ai_overview_A_B_C_D_parashara").unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn falls_back_to_durable_tier_on_fast_miss() {
        let fast = MemoryStore::new();
        let durable = MemoryStore::new();
        let report = CachedReport::new(json!("cached html"), "2024-06-01T10:00:00Z");
        durable
            .set("key", &serde_json::to_string(&report).unwrap())
            .unwrap();
        let cache = TieredCache::new(&fast, &durable);
        assert_eq!(cache.load("key"), Some(report));
    }

    #[test]
    fn corrupted_entry_is_evicted_from_both_tiers() {
        let fast = MemoryStore::new();
        let durable = MemoryStore::new();
        fast.set("key", "{not json").unwrap();
        durable.set("key", "{not json").unwrap();
        let cache = TieredCache::new(&fast, &durable);
        assert_eq!(cache.load("key"), None);
        assert!(fast.is_empty());
        assert!(durable.is_empty());
    }

    #[test]
    fn broken_stores_never_fail_the_caller() {
        let cache = TieredCache::new(BrokenStore, BrokenStore);
        let report = CachedReport::new(json!({}), "2024-06-01T10:00:00Z");
        cache.store("key", &report);
        assert_eq!(cache.load("key"), None);
        cache.invalidate("key");
    }

    #[test]
    fn broken_fast_tier_still_reads_durable() {
        let durable = MemoryStore::new();
        let report = CachedReport::new(json!(42), "2024-06-01T10:00:00Z");
        durable
            .set("key", &serde_json::to_string(&report).unwrap())
            .unwrap();
        let cache = TieredCache::new(BrokenStore, &durable);
        assert_eq!(cache.load("key"), Some(report));
    }

    #[test]
    fn invalidate_clears_both_tiers() {
        let fast = MemoryStore::new();
        let durable = MemoryStore::new();
        let cache = TieredCache::new(&fast, &durable);
        cache.store("key", &CachedReport::new(json!(1), "t"));
        assert_eq!(fast.len(), 1);
        assert_eq!(durable.len(), 1);
        cache.invalidate("key");
        assert!(fast.is_empty());
        assert!(durable.is_empty());
    }
}
