use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the promotional footer bar
///
/// Contains the option store location, cache lifetimes, display behaviour,
/// the secret used to mint admin nonces and logging options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the option store keeps its files
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Defaults to `data/` next to the configuration file
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_object_ttl_secs")]
    pub object_ttl_secs: u64, // process tier
    #[serde(default = "default_transient_ttl_secs")]
    pub transient_ttl_secs: u64, // persistent tier
}

fn default_object_ttl_secs() -> u64 {
    3600
}

fn default_transient_ttl_secs() -> u64 {
    86_400
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            object_ttl_secs: default_object_ttl_secs(),
            transient_ttl_secs: default_transient_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Draw again among the remaining eligible notifications when the
    /// first pick was dismissed, instead of showing nothing
    #[serde(default)]
    pub reroll_dismissed: bool,
    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,
}

/// Hard ceiling on the stored list, whatever the configuration says
pub const MAX_NOTIFICATIONS: usize = 10;

fn default_max_notifications() -> usize {
    MAX_NOTIFICATIONS
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            reroll_dismissed: false,
            max_notifications: default_max_notifications(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "generate_nonce_secret")]
    pub nonce_secret: String,
    #[serde(default = "default_nonce_lifetime_secs")]
    pub nonce_lifetime_secs: u64,
}

fn generate_nonce_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

fn default_nonce_lifetime_secs() -> u64 {
    86_400
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            nonce_secret: generate_nonce_secret(),
            nonce_lifetime_secs: default_nonce_lifetime_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Daily rolling log file; console-only when unset
    pub log_path: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_path: None,
        }
    }
}
