//! Notification management handler
//!
//! Listing, importing and exporting the stored notifications. Every write
//! goes through the authorized save path, so imported entries are
//! sanitized exactly like a settings-form submission.

use super::super::CliContext;
use anyhow::{Context, Result};
use promo_footer_bar::auth::SAVE_NOTIFICATIONS_ACTION;
use promo_footer_bar::config::MAX_NOTIFICATIONS;
use promo_footer_bar::errors::AppError;
use promo_footer_bar::notifications::dismissal;
use promo_footer_bar::notifications::presets;
use promo_footer_bar::notifications::{NotificationRecord, RawNotification};
use std::path::Path;
use tracing::info;

/// Handler for notification list operations
pub struct NoticeHandler<'a> {
    context: &'a CliContext,
}

impl<'a> NoticeHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle_list(&self) -> Result<()> {
        let records = self.context.repository().all()?;
        if records.is_empty() {
            println!("No notifications stored");
            return Ok(());
        }

        for (index, record) in records.iter().enumerate() {
            let status = if record.enabled { "enabled" } else { "disabled" };
            println!("[{index}] {status:<8} {}", record.title);
            println!(
                "      show on: {}, position: {}, dismissible: {}, fingerprint: {}",
                record.show_on.as_str(),
                record.position.as_str(),
                record.dismissible,
                dismissal::fingerprint(record)
            );
            if !record.start_date.is_empty() || !record.end_date.is_empty() {
                println!(
                    "      schedule: {} .. {}",
                    display_date(&record.start_date),
                    display_date(&record.end_date)
                );
            }
        }

        Ok(())
    }

    /// Replace the stored list with the entries of a JSON file
    pub fn handle_import(&self, file: &Path) -> Result<()> {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let submitted: Vec<RawNotification> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of notifications", file.display()))?;

        let saved = self.save(&submitted)?;
        println!("Imported {} of {} notifications", saved.len(), submitted.len());
        Ok(())
    }

    pub fn handle_export(&self) -> Result<()> {
        let records = self.context.repository().all()?;
        println!("{}", serde_json::to_string_pretty(&records)?);
        Ok(())
    }

    pub fn handle_apply_template(&self, name: &str) -> Result<()> {
        let preset = presets::find(name)?;
        let mut records = self.context.repository().all()?;

        let max = self
            .context
            .config_manager
            .config()
            .display
            .max_notifications
            .min(MAX_NOTIFICATIONS);
        if records.len() >= max {
            return Err(anyhow::anyhow!(
                "Maximum {max} notifications allowed. Please remove a notification first."
            ));
        }

        records.push(preset.to_record());
        let submitted: Vec<RawNotification> = records.iter().map(RawNotification::from).collect();
        let saved = self.save(&submitted)?;

        println!("Added '{}' as notification #{}", preset.name, saved.len() - 1);
        Ok(())
    }

    pub fn handle_dismiss_cookie(&self, index: usize) -> Result<()> {
        let records = self.context.repository().all()?;
        let record = records.get(index).ok_or(AppError::NotificationNotFound {
            index,
            count: records.len(),
        })?;

        println!("{}", dismissal::dismissal_set_cookie(record));
        Ok(())
    }

    pub fn handle_uninstall(&self) -> Result<()> {
        self.context.repository().purge()?;
        info!("Uninstalled from {}", self.context.config_manager.data_dir().display());
        println!("Removed all notifications, tracking code settings and cached data");
        Ok(())
    }

    fn save(&self, submitted: &[RawNotification]) -> Result<Vec<NotificationRecord>> {
        let service = self.context.settings_service(self.context.repository());
        let (principal, nonce) = self.context.operator(&service, SAVE_NOTIFICATIONS_ACTION);
        Ok(service.save_notifications(&principal, Some(&nonce), submitted)?)
    }
}

fn display_date(date: &str) -> &str {
    if date.is_empty() {
        "open"
    } else {
        date
    }
}

super::traits::impl_context_handler!(NoticeHandler);
