//! Notification repository
//!
//! Owns the stored notification list and the tracking-scripts settings,
//! and keeps the enabled-notifications cache coherent with writes.

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::cache::{CacheTier, TieredCache};
use super::options::{FileOptionStore, OptionStore, OptionStoreExt};
use crate::config::CacheConfig;
use crate::errors::AppResult;
use crate::notifications::eligibility;
use crate::notifications::{NotificationRecord, ScriptsSettings};

pub const NOTIFICATIONS_OPTION: &str = "pfb_notifications";
pub const SCRIPTS_OPTION: &str = "pfb_scripts_settings";
pub const ENABLED_CACHE_KEY: &str = "pfb_enabled_notifications";
pub const SCRIPTS_CACHE_KEY: &str = "pfb_scripts_settings";

pub struct NotificationRepository {
    store: Arc<dyn OptionStore>,
    cache: TieredCache,
}

impl NotificationRepository {
    pub fn new(store: Arc<dyn OptionStore>, cache_config: &CacheConfig) -> Self {
        let cache = TieredCache::new(
            store.clone(),
            Duration::from_secs(cache_config.object_ttl_secs),
            Duration::from_secs(cache_config.transient_ttl_secs),
        );
        Self { store, cache }
    }

    /// Repository backed by JSON files under `data_dir`
    pub fn from_data_dir(data_dir: &Path, cache_config: &CacheConfig) -> Self {
        Self::new(Arc::new(FileOptionStore::new(data_dir)), cache_config)
    }

    pub fn store(&self) -> &Arc<dyn OptionStore> {
        &self.store
    }

    /// Every stored notification in operator order
    ///
    /// Entries that no longer decode are skipped with a warning so one bad
    /// record cannot hide the rest.
    pub fn all(&self) -> AppResult<Vec<NotificationRecord>> {
        let raw: Option<Vec<Value>> = self.store.get_as(NOTIFICATIONS_OPTION)?;
        let records = raw
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping stored notification #{}: {}", index, e);
                    None
                }
            })
            .collect();
        Ok(records)
    }

    /// Enabled notifications with a non-empty title, served from cache
    ///
    /// Only this pre-filter is cached. Schedules and display rules depend
    /// on the request and are evaluated by the caller every time.
    pub fn enabled(&self) -> AppResult<Vec<NotificationRecord>> {
        if let Some(cached) = self.cache.get(ENABLED_CACHE_KEY) {
            match serde_json::from_value::<Vec<NotificationRecord>>(cached) {
                Ok(records) => return Ok(records),
                Err(e) => warn!("Discarding malformed enabled-notifications cache: {}", e),
            }
        }

        let enabled: Vec<NotificationRecord> = self
            .all()?
            .into_iter()
            .filter(eligibility::is_enabled)
            .collect();
        debug!("Rebuilt enabled-notifications cache with {} entries", enabled.len());

        let value = serde_json::to_value(&enabled)?;
        if let Err(e) = self.cache.set(ENABLED_CACHE_KEY, &value) {
            warn!("Failed to cache enabled notifications: {}", e);
        }

        Ok(enabled)
    }

    /// Replace the whole list, then drop the enabled cache
    ///
    /// The cache is invalidated only after the write succeeded, so a failed
    /// save leaves both the list and the cache untouched.
    pub fn replace_all(&self, records: &[NotificationRecord]) -> AppResult<()> {
        self.store.set_as(NOTIFICATIONS_OPTION, &records)?;
        self.cache.invalidate(ENABLED_CACHE_KEY)?;
        info!("Saved {} notifications", records.len());
        Ok(())
    }

    /// Tracking-scripts settings, defaults when never saved
    pub fn scripts_settings(&self) -> AppResult<ScriptsSettings> {
        let process = self.cache.process();
        if let Some(cached) = process.get(SCRIPTS_CACHE_KEY) {
            if let Ok(settings) = serde_json::from_value(cached) {
                return Ok(settings);
            }
        }

        let settings: ScriptsSettings = self.store.get_as(SCRIPTS_OPTION)?.unwrap_or_default();
        let value = serde_json::to_value(&settings)?;
        if let Err(e) = process.set(SCRIPTS_CACHE_KEY, &value, self.cache.process_ttl()) {
            warn!("Failed to cache scripts settings: {}", e);
        }
        Ok(settings)
    }

    pub fn replace_scripts_settings(&self, settings: &ScriptsSettings) -> AppResult<()> {
        self.store.set_as(SCRIPTS_OPTION, settings)?;
        self.cache.process().invalidate(SCRIPTS_CACHE_KEY)?;
        info!("Saved tracking scripts settings");
        Ok(())
    }

    /// Remove every option and cache entry this crate ever wrote
    pub fn purge(&self) -> AppResult<()> {
        self.store.delete(NOTIFICATIONS_OPTION)?;
        self.store.delete(SCRIPTS_OPTION)?;
        self.cache.invalidate(ENABLED_CACHE_KEY)?;
        self.cache.process().invalidate(SCRIPTS_CACHE_KEY)?;
        info!("Removed all stored notifications and settings");
        Ok(())
    }
}
