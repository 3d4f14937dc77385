//! Configuration management handler
//!
//! This module handles configuration initialization and reading or
//! writing individual settings.

use super::super::{CliContext, ConfigAction};
use anyhow::Result;
use promo_footer_bar::config::ConfigManager;
use std::path::PathBuf;

/// Handler for configuration operations
pub struct ConfigHandler<'a> {
    context: &'a CliContext,
}

impl<'a> ConfigHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    /// Handle configuration initialization
    pub fn handle_init(&self, global: bool, force: bool) -> Result<()> {
        let path = if global {
            None
        } else {
            Some(self.context.project_path.clone().unwrap_or_else(|| PathBuf::from(".")))
        };

        // Loading the context may already have written this very file
        let config_path = ConfigManager::get_config_path(path.clone())?;
        let loaded = &self.context.config_manager;
        let created_now = loaded.config_path() == config_path && loaded.was_created();
        let config_exists = config_path.exists() && !created_now;

        if config_exists && !force {
            println!("Configuration already initialized at: {}", config_path.display());
            println!("Use --force to overwrite");
            return Ok(());
        }

        if config_exists {
            std::fs::remove_file(&config_path)?;
        }

        let config_manager = match path {
            None => ConfigManager::new(None)?,
            // For project init, force creation of project config even if global exists
            Some(path) => ConfigManager::new_project_config(path)?,
        };
        config_manager.save()?;

        println!("Configuration initialized successfully at: {}", config_path.display());
        println!("Notifications will be stored in: {}", config_manager.data_dir().display());
        println!();
        println!("Next steps:");
        println!("  promo-footer-bar templates                 # browse presets");
        println!("  promo-footer-bar apply-template <name>     # start from a preset");
        println!("  promo-footer-bar import notifications.json # or import your own");
        println!("  promo-footer-bar render --page-type home   # preview the bar");

        Ok(())
    }

    /// Handle configuration management
    pub fn handle_config(&self, action: ConfigAction) -> Result<()> {
        // Load a fresh, mutable manager for the same configuration file
        let mut config_manager = ConfigManager::new(self.context.project_path.clone())?;

        match action {
            ConfigAction::Show => {
                println!("# {}", config_manager.config_path().display());
                println!("{}", toml::to_string_pretty(config_manager.config())?);
            }
            ConfigAction::Set { key, value } => {
                config_manager.set_value(&key, &value)?;
                config_manager.save()?;
                println!("Configuration updated: {key} = {value}");
            }
            ConfigAction::Get { key } => {
                println!("{}", config_manager.get_value(&key)?);
            }
        }

        Ok(())
    }
}

super::traits::impl_context_handler!(ConfigHandler);
