//! Command definitions and structures for the CLI
//!
//! This module contains all the clap-based command line argument definitions,
//! including the main CLI structure and all subcommands.

use clap::{Args, Parser, Subcommand};
use promo_footer_bar::PageType;
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "promo-footer-bar")]
#[command(about = "Manage and preview the promotional footer bar")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project path for project-level configuration
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration
    Init {
        /// Initialize global configuration (default is project-level)
        #[arg(short, long)]
        global: bool,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List stored notifications
    List,

    /// Replace all notifications with the entries of a JSON file
    Import {
        /// JSON array of notification form entries
        file: PathBuf,
    },

    /// Print stored notifications as JSON
    Export,

    /// List preset templates
    Templates {
        /// Show one preset in full
        #[arg(short, long)]
        show: Option<String>,
    },

    /// Append a preset as a new notification
    ApplyTemplate {
        /// Preset name, e.g. "Black Friday Sale"
        name: String,
    },

    /// Show which notifications are eligible for a request
    Eligible {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Render the footer bar for a request
    Render {
        #[command(flatten)]
        request: RequestArgs,

        /// Raw Cookie header sent by the visitor
        #[arg(long)]
        cookie: Option<String>,

        /// Print head and footer fragments including tracking code
        #[arg(long)]
        page: bool,
    },

    /// Print the Set-Cookie value that dismisses a notification
    DismissCookie {
        /// Position in the stored list, starting at 0
        index: usize,
    },

    /// Manage header and footer tracking code
    Scripts {
        #[command(subcommand)]
        action: ScriptsAction,
    },

    /// Delete all stored notifications, settings and cache entries
    Uninstall,
}

/// Simulated visitor request
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Page type: home, post, page or other
    #[arg(long, default_value = "other")]
    pub page_type: PageType,

    /// Treat the visitor as logged in
    #[arg(long)]
    pub logged_in: bool,

    /// Site-local time as "YYYY-MM-DD HH:MM:SS" (defaults to now)
    #[arg(long)]
    pub now: Option<String>,
}

/// Configuration management actions
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key (e.g., display.reroll_dismissed)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },
}

/// Tracking code actions
#[derive(Subcommand)]
pub enum ScriptsAction {
    /// Show current tracking code settings
    Show,

    /// Save tracking code settings from a JSON file
    Import {
        /// JSON object with header_enabled, header_code, footer_enabled,
        /// footer_code and footer_priority
        file: PathBuf,
    },
}
