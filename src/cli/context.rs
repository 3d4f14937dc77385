//! CLI Context for dependency injection and shared state
//!
//! This module provides the CliContext abstraction that centralizes
//! configuration management and builds the engine pieces handlers need.

use anyhow::{Context, Result};
use promo_footer_bar::admin::SettingsService;
use promo_footer_bar::auth::{NonceVerifier, Principal};
use promo_footer_bar::config::ConfigManager;
use promo_footer_bar::templates::FooterRenderer;
use promo_footer_bar::{FooterBar, NotificationRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI execution context containing shared dependencies and configuration
#[derive(Clone)]
pub struct CliContext {
    pub project_path: Option<PathBuf>,
    pub verbose: bool,
    pub config_manager: Arc<ConfigManager>,
}

impl CliContext {
    /// Create a new CLI context with the specified project path and verbosity
    pub fn new(project_path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        // Auto-detect project path if not specified
        let resolved_project_path = Self::resolve_project_path(project_path);
        let config_manager = Arc::new(ConfigManager::new(resolved_project_path.clone())?);

        Ok(Self {
            project_path: resolved_project_path,
            verbose,
            config_manager,
        })
    }

    /// Auto-detect project path by looking for .promo-footer-bar/config.toml
    fn resolve_project_path(project_path: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(path) = project_path {
            return Some(path);
        }

        if let Ok(current_dir) = std::env::current_dir() {
            let config_path = current_dir.join(".promo-footer-bar").join("config.toml");
            if config_path.exists() {
                return Some(current_dir);
            }
        }

        // No project config found, use global config
        None
    }

    /// Initialize logging on stderr, plus a daily rolling file when
    /// `logging.log_path` is set
    ///
    /// The returned guard must be held until exit for file output to be
    /// flushed.
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        use tracing_subscriber::prelude::*;

        let logging = &self.config_manager.config().logging;
        let log_level = if self.verbose { "debug" } else { logging.level.as_str() };
        let env_filter = tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(log_level.parse().unwrap_or_else(|_| tracing::Level::INFO.into()));

        let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        let (file_layer, guard) = match &logging.log_path {
            Some(log_path) => {
                let log_path = PathBuf::from(log_path);
                let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
                std::fs::create_dir_all(directory).context("Failed to create log directory")?;

                let file_appender = tracing_appender::rolling::daily(
                    directory,
                    log_path
                        .file_name()
                        .unwrap_or_else(|| std::ffi::OsStr::new("promo-footer-bar.log")),
                );
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .context("Failed to initialize logging")?;

        if self.verbose {
            tracing::debug!("Verbose logging enabled");
            tracing::debug!("Project path: {:?}", self.project_path);
            tracing::debug!("Config path: {:?}", self.config_manager.config_path());
        }

        Ok(guard)
    }

    pub fn repository(&self) -> Arc<NotificationRepository> {
        Arc::new(NotificationRepository::from_data_dir(
            &self.config_manager.data_dir(),
            &self.config_manager.config().cache,
        ))
    }

    pub fn footer_bar(&self, repository: Arc<NotificationRepository>) -> Result<FooterBar> {
        let renderer = FooterRenderer::new()?;
        Ok(FooterBar::new(repository, renderer)
            .with_reroll_dismissed(self.config_manager.config().display.reroll_dismissed))
    }

    pub fn settings_service(&self, repository: Arc<NotificationRepository>) -> SettingsService {
        let config = self.config_manager.config();
        SettingsService::new(
            repository,
            NonceVerifier::from_config(&config.security),
            config.display.max_notifications,
        )
    }

    /// The CLI acts as the site operator, minting its own nonce
    pub fn operator(&self, service: &SettingsService, action: &str) -> (Principal, String) {
        let principal = Principal::operator();
        let nonce = service.verifier().create(action, principal.user_id);
        (principal, nonce)
    }
}
