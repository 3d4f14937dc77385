//! Argument processing and validation for CLI commands
//!
//! This module handles argument validation and normalization before
//! commands are routed to their respective handlers.

use super::{Commands, ConfigAction, RequestArgs, ScriptsAction};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use promo_footer_bar::config::VALID_CONFIG_KEYS;
use promo_footer_bar::footer::PageRequest;
use promo_footer_bar::notifications::{CookieJar, RequestContext};
use std::path::Path;

pub const NOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Handles argument processing and validation
pub struct ArgProcessor;

impl ArgProcessor {
    /// Create a new argument processor
    pub fn new() -> Self {
        Self
    }

    /// Validate command arguments
    pub fn validate_command(&self, command: &Commands) -> Result<()> {
        match command {
            Commands::Config { action } => self.validate_config_action(action),
            Commands::Import { file } => self.validate_input_file(file),
            Commands::Scripts { action: ScriptsAction::Import { file } } => self.validate_input_file(file),
            Commands::ApplyTemplate { name } => {
                if name.trim().is_empty() {
                    return Err(anyhow::anyhow!("Template name cannot be empty"));
                }
                Ok(())
            }
            Commands::Eligible { request } | Commands::Render { request, .. } => {
                self.parse_now(request.now.as_deref())?;
                Ok(())
            }
            Commands::Init { .. }
            | Commands::List
            | Commands::Export
            | Commands::Templates { .. }
            | Commands::DismissCookie { .. }
            | Commands::Scripts { action: ScriptsAction::Show }
            | Commands::Uninstall => {
                // No additional validation needed for these commands
                Ok(())
            }
        }
    }

    /// Validate configuration action arguments
    fn validate_config_action(&self, action: &ConfigAction) -> Result<()> {
        match action {
            ConfigAction::Set { key, .. } | ConfigAction::Get { key } => {
                if key.is_empty() {
                    return Err(anyhow::anyhow!("Configuration key cannot be empty"));
                }
                self.validate_config_key(key)
            }
            ConfigAction::Show => Ok(()),
        }
    }

    /// Validate that a configuration key is known/supported
    fn validate_config_key(&self, key: &str) -> Result<()> {
        if !VALID_CONFIG_KEYS.contains(&key) {
            return Err(anyhow::anyhow!(
                "Unknown configuration key: {}. Valid keys are: {}",
                key,
                VALID_CONFIG_KEYS.join(", ")
            ));
        }
        Ok(())
    }

    fn validate_input_file(&self, file: &Path) -> Result<()> {
        if !file.is_file() {
            return Err(anyhow::anyhow!("Input file not found: {}", file.display()));
        }
        Ok(())
    }

    /// Parse `--now`, defaulting to the current local time
    pub fn parse_now(&self, now: Option<&str>) -> Result<NaiveDateTime> {
        match now {
            Some(value) => NaiveDateTime::parse_from_str(value.trim(), NOW_FORMAT)
                .with_context(|| format!("Invalid --now '{value}', expected YYYY-MM-DD HH:MM:SS")),
            None => Ok(Local::now().naive_local()),
        }
    }

    /// Build the engine request for a simulated page view
    pub fn page_request(&self, args: &RequestArgs, cookie: Option<&str>) -> Result<PageRequest> {
        let now = self.parse_now(args.now.as_deref())?;
        let cookies = cookie.map(CookieJar::from_header).unwrap_or_default();

        Ok(PageRequest::new(RequestContext::new(args.logged_in, args.page_type))
            .at(now)
            .with_cookies(cookies))
    }
}

impl Default for ArgProcessor {
    fn default() -> Self {
        Self::new()
    }
}
