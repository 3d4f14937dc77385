//! Command handlers for all CLI operations
//!
//! This module routes parsed commands to the handler responsible for them,
//! providing clean separation between CLI parsing and business logic.

mod config;
mod notices;
mod render;
mod scripts;
mod templates;
mod traits;

use super::{CliContext, Commands};
use anyhow::Result;
use tracing::debug;

use config::ConfigHandler;
use notices::NoticeHandler;
use render::RenderHandler;
use scripts::ScriptsHandler;
use templates::TemplateHandler;
use traits::HandlerBuilder;

/// Coordinates all command handling operations with dependency injection via CliContext
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    /// Create a new command handler instance with the provided context
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route commands to their appropriate handlers
    pub fn handle_command(&self, command: Commands) -> Result<()> {
        let builder = HandlerBuilder::new(&self.context);
        debug!("Config file: {}", self.context.config_manager.config_path().display());

        match command {
            Commands::Init { global, force } => {
                builder.create_with_context::<ConfigHandler>().handle_init(global, force)
            }
            Commands::Config { action } => {
                builder.create_with_context::<ConfigHandler>().handle_config(action)
            }
            Commands::List => builder.create_with_context::<NoticeHandler>().handle_list(),
            Commands::Import { file } => {
                builder.create_with_context::<NoticeHandler>().handle_import(&file)
            }
            Commands::Export => builder.create_with_context::<NoticeHandler>().handle_export(),
            Commands::Templates { show } => {
                HandlerBuilder::create_stateless::<TemplateHandler>().handle_templates(show)
            }
            Commands::ApplyTemplate { name } => {
                builder.create_with_context::<NoticeHandler>().handle_apply_template(&name)
            }
            Commands::Eligible { request } => {
                builder.create_with_context::<RenderHandler>().handle_eligible(&request)
            }
            Commands::Render { request, cookie, page } => builder
                .create_with_context::<RenderHandler>()
                .handle_render(&request, cookie.as_deref(), page),
            Commands::DismissCookie { index } => {
                builder.create_with_context::<NoticeHandler>().handle_dismiss_cookie(index)
            }
            Commands::Scripts { action } => {
                builder.create_with_context::<ScriptsHandler>().handle_scripts(action)
            }
            Commands::Uninstall => builder.create_with_context::<NoticeHandler>().handle_uninstall(),
        }
    }
}
