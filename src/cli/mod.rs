//! CLI module providing command-line interface functionality
//!
//! This module handles argument parsing, command validation, and routing
//! to appropriate handlers while maintaining separation of concerns.

pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;

use anyhow::Result;
use clap::Parser;

pub use args::ArgProcessor;
pub use commands::{Cli, Commands, ConfigAction, RequestArgs, ScriptsAction};
pub use context::CliContext;
pub use handlers::CommandHandler;

/// Main CLI application following the CliContext pattern
pub struct CliApp;

impl CliApp {
    /// Parse command line arguments and execute the requested command
    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        ArgProcessor::new().validate_command(&cli.command)?;

        // Create CLI context with project path and verbosity
        let context = CliContext::new(cli.project.clone(), cli.verbose)?;

        // The guard flushes the log file on drop, so it lives until exit
        let _log_guard = context.init_logging()?;

        let handler = CommandHandler::new(context);
        handler.handle_command(cli.command)
    }
}
