//! Read-through cache tiers
//!
//! Two tiers are consulted in order: a process-local map with a short TTL,
//! then a persistent tier kept in the option store with a longer TTL.
//! Cache reads never fail; a broken entry counts as a miss.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::options::OptionStore;
use crate::errors::AppResult;

/// Trait for a single cache tier
pub trait CacheTier: Send + Sync {
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: &Value, ttl: Duration) -> AppResult<()>;

    fn invalidate(&self, key: &str) -> AppResult<()>;
}

/// Entries live only as long as the process
#[derive(Debug, Default)]
pub struct ProcessCache {
    entries: Mutex<HashMap<String, (Value, Instant)>>,
}

impl ProcessCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Value, Instant)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheTier for ProcessCache {
    fn name(&self) -> &'static str {
        "process"
    }

    fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some((value, expires_at)) if Instant::now() < *expires_at => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: &Value, ttl: Duration) -> AppResult<()> {
        self.entries()
            .insert(key.to_string(), (value.clone(), Instant::now() + ttl));
        Ok(())
    }

    fn invalidate(&self, key: &str) -> AppResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TransientEntry {
    /// Unix seconds
    expires_at: i64,
    value: Value,
}

/// Entries survive across processes as `_transient_<key>` options
pub struct PersistentCache {
    store: Arc<dyn OptionStore>,
}

impl PersistentCache {
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self { store }
    }

    fn option_key(key: &str) -> String {
        format!("_transient_{key}")
    }
}

impl CacheTier for PersistentCache {
    fn name(&self) -> &'static str {
        "persistent"
    }

    fn get(&self, key: &str) -> Option<Value> {
        let option_key = Self::option_key(key);
        let raw = match self.store.get(&option_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Ignoring unreadable cache entry '{}': {}", key, e);
                return None;
            }
        };

        let entry: TransientEntry = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring malformed cache entry '{}': {}", key, e);
                return None;
            }
        };

        if Utc::now().timestamp() >= entry.expires_at {
            debug!("Cache entry '{}' expired", key);
            if let Err(e) = self.store.delete(&option_key) {
                warn!("Failed to drop expired cache entry '{}': {}", key, e);
            }
            return None;
        }

        Some(entry.value)
    }

    fn set(&self, key: &str, value: &Value, ttl: Duration) -> AppResult<()> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let entry = TransientEntry {
            expires_at: Utc::now().timestamp().saturating_add(ttl_secs),
            value: value.clone(),
        };
        let raw = serde_json::to_value(&entry)?;
        self.store.set(&Self::option_key(key), &raw)
    }

    fn invalidate(&self, key: &str) -> AppResult<()> {
        self.store.delete(&Self::option_key(key))
    }
}

/// Process tier in front of the persistent tier
pub struct TieredCache {
    process: ProcessCache,
    persistent: PersistentCache,
    process_ttl: Duration,
    persistent_ttl: Duration,
}

impl TieredCache {
    pub fn new(store: Arc<dyn OptionStore>, process_ttl: Duration, persistent_ttl: Duration) -> Self {
        Self {
            process: ProcessCache::new(),
            persistent: PersistentCache::new(store),
            process_ttl,
            persistent_ttl,
        }
    }

    /// The process tier alone, for values that are not worth persisting
    pub fn process(&self) -> &ProcessCache {
        &self.process
    }

    pub fn process_ttl(&self) -> Duration {
        self.process_ttl
    }

    /// A persistent hit back-fills the process tier
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.process.get(key) {
            debug!("Cache hit for '{}' in {} tier", key, self.process.name());
            return Some(value);
        }

        let value = self.persistent.get(key)?;
        debug!("Cache hit for '{}' in {} tier", key, self.persistent.name());
        if let Err(e) = self.process.set(key, &value, self.process_ttl) {
            warn!("Failed to back-fill process cache for '{}': {}", key, e);
        }
        Some(value)
    }

    pub fn set(&self, key: &str, value: &Value) -> AppResult<()> {
        self.persistent.set(key, value, self.persistent_ttl)?;
        self.process.set(key, value, self.process_ttl)
    }

    /// Clears both tiers
    pub fn invalidate(&self, key: &str) -> AppResult<()> {
        self.persistent.invalidate(key)?;
        self.process.invalidate(key)
    }
}
