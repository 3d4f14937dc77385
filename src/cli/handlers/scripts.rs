//! Tracking code handler

use super::super::{CliContext, ScriptsAction};
use anyhow::{Context, Result};
use promo_footer_bar::auth::SAVE_SCRIPTS_ACTION;
use promo_footer_bar::scripts::RawScriptsSettings;

pub struct ScriptsHandler<'a> {
    context: &'a CliContext,
}

impl<'a> ScriptsHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle_scripts(&self, action: ScriptsAction) -> Result<()> {
        let repository = self.context.repository();

        match action {
            ScriptsAction::Show => {
                let settings = repository.scripts_settings()?;
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            ScriptsAction::Import { file } => {
                let content = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let submitted: RawScriptsSettings = serde_json::from_str(&content)
                    .with_context(|| format!("{} is not a scripts settings object", file.display()))?;

                let service = self.context.settings_service(repository);
                let (principal, nonce) = self.context.operator(&service, SAVE_SCRIPTS_ACTION);
                let saved = service.save_scripts(&principal, Some(&nonce), &submitted)?;

                println!(
                    "Saved tracking code (header: {}, footer: {}, footer priority: {})",
                    if saved.header_code.enabled { "on" } else { "off" },
                    if saved.footer_code.enabled { "on" } else { "off" },
                    u8::from(saved.footer_code.priority)
                );
            }
        }

        Ok(())
    }
}

super::traits::impl_context_handler!(ScriptsHandler);
