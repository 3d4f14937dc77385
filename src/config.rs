use crate::errors::{AppError, AppResult};
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};

// Re-export shared types for convenience
pub use crate::shared::config::{
    CacheConfig, Config, DisplayConfig, LoggingConfig, SecurityConfig, StoreConfig, MAX_NOTIFICATIONS,
};

const CONFIG_DIR_NAME: &str = ".promo-footer-bar";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Keys accepted by [`ConfigManager::get_value`] and [`ConfigManager::set_value`]
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "store.data_dir",
    "cache.object_ttl_secs",
    "cache.transient_ttl_secs",
    "display.reroll_dismissed",
    "display.max_notifications",
    "security.nonce_lifetime_secs",
    "logging.level",
    "logging.log_path",
];

/// Configuration manager for the promotional footer bar
///
/// Handles loading, saving, and managing configuration for both project-level
/// and global configurations. Project configurations take precedence over global ones.
///
/// # Configuration Hierarchy
///
/// 1. **Project-level**: `.promo-footer-bar/config.toml` in project root
/// 2. **Global**: `~/.promo-footer-bar/config.toml` in user home directory
///
/// # Example
///
/// ```rust,no_run
/// use promo_footer_bar::config::ConfigManager;
/// use std::path::PathBuf;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config_manager = ConfigManager::new(Some(PathBuf::from("/path/to/site")))?;
///     println!("Data dir: {}", config_manager.data_dir().display());
///     Ok(())
/// }
/// ```
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
    created: bool,
}

impl ConfigManager {
    /// Creates a new ConfigManager instance
    ///
    /// With a project path, an existing project config wins, then an existing
    /// global config; when neither exists a project config is created.
    /// Without a project path the global config is used.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration directory cannot be created
    /// - The configuration file cannot be read or parsed
    /// - Default configuration cannot be serialized and written
    pub fn new(project_path: Option<PathBuf>) -> AppResult<Self> {
        if let Some(ref path) = project_path {
            let project_config_path = Self::get_config_path(Some(path.clone()))?;

            if project_config_path.exists() {
                let (config, created) = Self::load_or_create(&project_config_path)?;
                return Ok(ConfigManager {
                    config_path: project_config_path,
                    config,
                    created,
                });
            }

            let global_config_path = Self::global_config_path()?;
            if global_config_path.exists() {
                let (config, created) = Self::load_or_create(&global_config_path)?;
                return Ok(ConfigManager {
                    config_path: global_config_path,
                    config,
                    created,
                });
            }

            let (config, created) = Self::load_or_create(&project_config_path)?;
            Ok(ConfigManager {
                config_path: project_config_path,
                config,
                created,
            })
        } else {
            let config_path = Self::get_config_path(None)?;
            let (config, created) = Self::load_or_create(&config_path)?;
            Ok(ConfigManager {
                config_path,
                config,
                created,
            })
        }
    }

    /// Always creates or uses project-level configuration, even if a global
    /// configuration exists
    pub fn new_project_config(project_path: PathBuf) -> AppResult<Self> {
        let config_path = Self::get_config_path(Some(project_path))?;
        let (config, created) = Self::load_or_create(&config_path)?;

        Ok(ConfigManager {
            config_path,
            config,
            created,
        })
    }

    /// Resolves the config file path, creating its directory
    pub fn get_config_path(project_path: Option<PathBuf>) -> AppResult<PathBuf> {
        let base_path = match project_path {
            Some(path) => {
                if !path.is_dir() {
                    return Err(AppError::config(format!(
                        "Project path does not exist: {}",
                        path.display()
                    )));
                }
                path.join(CONFIG_DIR_NAME)
            }
            None => Self::global_base_dir()?,
        };

        fs::create_dir_all(&base_path)
            .map_err(|e| AppError::io_with_source(&base_path, "create config directory", e))?;

        Ok(base_path.join(CONFIG_FILE_NAME))
    }

    fn global_base_dir() -> AppResult<PathBuf> {
        let base_dirs = BaseDirs::new().ok_or_else(|| AppError::config("Failed to get base directories"))?;
        Ok(base_dirs.home_dir().join(CONFIG_DIR_NAME))
    }

    fn global_config_path() -> AppResult<PathBuf> {
        Ok(Self::global_base_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Returns the configuration and whether the file was written just now
    fn load_or_create(path: &Path) -> AppResult<(Config, bool)> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| AppError::io_with_source(path, "read config file", e))?;
            let config = toml::from_str(&content)?;
            Ok((config, false))
        } else {
            let config = Config::default();
            let content = toml::to_string_pretty(&config)
                .map_err(|e| AppError::config_with_source("Failed to serialize default config", e))?;
            fs::write(path, content)
                .map_err(|e| AppError::io_with_source(path, "write default config", e))?;
            Ok((config, true))
        }
    }

    /// Writes the configuration back to the TOML file it was loaded from
    pub fn save(&self) -> AppResult<()> {
        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| AppError::config_with_source("Failed to serialize config", e))?;
        fs::write(&self.config_path, content)
            .map_err(|e| AppError::io_with_source(&self.config_path, "write config file", e))?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Whether loading this manager wrote a fresh default file
    pub fn was_created(&self) -> bool {
        self.created
    }

    /// Directory holding the option store files
    ///
    /// A relative `store.data_dir` is resolved against the directory of the
    /// configuration file.
    pub fn data_dir(&self) -> PathBuf {
        let config_dir = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        match &self.config.store.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => config_dir.join(dir),
            None => config_dir.join("data"),
        }
    }

    /// Reads a whitelisted key as a display string
    pub fn get_value(&self, key: &str) -> AppResult<String> {
        let config = &self.config;
        let value = match key {
            "store.data_dir" => self.data_dir().display().to_string(),
            "cache.object_ttl_secs" => config.cache.object_ttl_secs.to_string(),
            "cache.transient_ttl_secs" => config.cache.transient_ttl_secs.to_string(),
            "display.reroll_dismissed" => config.display.reroll_dismissed.to_string(),
            "display.max_notifications" => config.display.max_notifications.to_string(),
            "security.nonce_lifetime_secs" => config.security.nonce_lifetime_secs.to_string(),
            "logging.level" => config.logging.level.clone(),
            "logging.log_path" => config.logging.log_path.clone().unwrap_or_default(),
            _ => return Err(AppError::UnknownConfigKey { key: key.to_string() }),
        };
        Ok(value)
    }

    /// Parses and assigns a whitelisted key. Does not persist.
    pub fn set_value(&mut self, key: &str, value: &str) -> AppResult<()> {
        let invalid = || AppError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let config = &mut self.config;

        match key {
            "store.data_dir" => config.store.data_dir = Some(PathBuf::from(value)),
            "cache.object_ttl_secs" => config.cache.object_ttl_secs = value.parse().map_err(|_| invalid())?,
            "cache.transient_ttl_secs" => config.cache.transient_ttl_secs = value.parse().map_err(|_| invalid())?,
            "display.reroll_dismissed" => config.display.reroll_dismissed = value.parse().map_err(|_| invalid())?,
            "display.max_notifications" => {
                let max: usize = value.parse().map_err(|_| invalid())?;
                if max == 0 || max > MAX_NOTIFICATIONS {
                    return Err(invalid());
                }
                config.display.max_notifications = max;
            }
            "security.nonce_lifetime_secs" => {
                let secs: u64 = value.parse().map_err(|_| invalid())?;
                if secs < 2 {
                    return Err(invalid());
                }
                config.security.nonce_lifetime_secs = secs;
            }
            "logging.level" => {
                value
                    .parse::<tracing_subscriber::filter::LevelFilter>()
                    .map_err(|_| invalid())?;
                config.logging.level = value.to_string();
            }
            "logging.log_path" => {
                config.logging.log_path = if value.is_empty() { None } else { Some(value.to_string()) };
            }
            _ => return Err(AppError::UnknownConfigKey { key: key.to_string() }),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_config_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::new_project_config(temp_dir.path().to_path_buf()).unwrap();

        assert!(temp_dir.path().join(".promo-footer-bar/config.toml").exists());
        assert_eq!(manager.data_dir(), temp_dir.path().join(".promo-footer-bar/data"));
        assert_eq!(manager.config().cache.transient_ttl_secs, 86_400);
    }

    #[test]
    fn test_secret_survives_reload() {
        let temp_dir = TempDir::new().unwrap();
        let first = ConfigManager::new_project_config(temp_dir.path().to_path_buf()).unwrap();
        let second = ConfigManager::new_project_config(temp_dir.path().to_path_buf()).unwrap();

        assert!(first.was_created());
        assert!(!second.was_created());
        assert_eq!(
            first.config().security.nonce_secret,
            second.config().security.nonce_secret
        );
    }

    #[test]
    fn test_set_and_get_values() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new_project_config(temp_dir.path().to_path_buf()).unwrap();

        manager.set_value("display.reroll_dismissed", "true").unwrap();
        manager.set_value("cache.object_ttl_secs", "60").unwrap();
        manager.save().unwrap();

        let reloaded = ConfigManager::new_project_config(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(reloaded.get_value("display.reroll_dismissed").unwrap(), "true");
        assert_eq!(reloaded.get_value("cache.object_ttl_secs").unwrap(), "60");
    }

    #[test]
    fn test_rejects_unknown_and_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new_project_config(temp_dir.path().to_path_buf()).unwrap();

        assert!(matches!(
            manager.set_value("security.nonce_secret", "leak"),
            Err(AppError::UnknownConfigKey { .. })
        ));
        assert!(matches!(
            manager.set_value("display.max_notifications", "zero"),
            Err(AppError::InvalidConfigValue { .. })
        ));
        assert!(manager.set_value("logging.level", "loud").is_err());
    }

    #[test]
    fn test_max_notifications_is_capped() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new_project_config(temp_dir.path().to_path_buf()).unwrap();

        assert!(matches!(
            manager.set_value("display.max_notifications", "50"),
            Err(AppError::InvalidConfigValue { .. })
        ));
        assert!(manager.set_value("display.max_notifications", "0").is_err());
        manager.set_value("display.max_notifications", "10").unwrap();
        manager.set_value("display.max_notifications", "3").unwrap();
        assert_eq!(manager.get_value("display.max_notifications").unwrap(), "3");
    }

    #[test]
    fn test_relative_data_dir_resolves_next_to_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new_project_config(temp_dir.path().to_path_buf()).unwrap();
        manager.set_value("store.data_dir", "options").unwrap();

        assert_eq!(manager.data_dir(), temp_dir.path().join(".promo-footer-bar/options"));
    }
}
