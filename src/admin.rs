//! Admin save path
//!
//! Both settings screens submit here. A save is authorized first and then
//! sanitized and written as a whole; a rejected save writes nothing.

use std::sync::Arc;
use tracing::info;

use crate::auth::{self, NonceVerifier, Principal, SAVE_NOTIFICATIONS_ACTION, SAVE_SCRIPTS_ACTION};
use crate::config::MAX_NOTIFICATIONS;
use crate::errors::AppResult;
use crate::notifications::{
    DefaultNotificationSanitizer, NotificationRecord, NotificationSanitizer, RawNotification,
    ScriptsSettings,
};
use crate::scripts::RawScriptsSettings;
use crate::storage::NotificationRepository;

pub struct SettingsService {
    repository: Arc<NotificationRepository>,
    verifier: NonceVerifier,
    sanitizer: Box<dyn NotificationSanitizer>,
    max_notifications: usize,
}

impl SettingsService {
    pub fn new(
        repository: Arc<NotificationRepository>,
        verifier: NonceVerifier,
        max_notifications: usize,
    ) -> Self {
        Self::with_sanitizer(
            repository,
            verifier,
            Box::new(DefaultNotificationSanitizer::new()),
            max_notifications,
        )
    }

    pub fn with_sanitizer(
        repository: Arc<NotificationRepository>,
        verifier: NonceVerifier,
        sanitizer: Box<dyn NotificationSanitizer>,
        max_notifications: usize,
    ) -> Self {
        Self {
            repository,
            verifier,
            sanitizer,
            max_notifications: max_notifications.min(MAX_NOTIFICATIONS),
        }
    }

    pub fn verifier(&self) -> &NonceVerifier {
        &self.verifier
    }

    /// Replace the stored notification list with a submitted form
    ///
    /// Returns the records actually stored, after sanitization dropped
    /// untitled entries and capped the count.
    pub fn save_notifications(
        &self,
        principal: &Principal,
        nonce: Option<&str>,
        submitted: &[RawNotification],
    ) -> AppResult<Vec<NotificationRecord>> {
        auth::authorize_save(&self.verifier, principal, nonce, SAVE_NOTIFICATIONS_ACTION)?;

        let records = self.sanitizer.sanitize_all(submitted, self.max_notifications);
        self.repository.replace_all(&records)?;

        info!(
            "User {} saved {} of {} submitted notifications",
            principal.user_id,
            records.len(),
            submitted.len()
        );
        Ok(records)
    }

    pub fn save_scripts(
        &self,
        principal: &Principal,
        nonce: Option<&str>,
        submitted: &RawScriptsSettings,
    ) -> AppResult<ScriptsSettings> {
        auth::authorize_save(&self.verifier, principal, nonce, SAVE_SCRIPTS_ACTION)?;

        let settings = submitted.sanitize(principal);
        self.repository.replace_scripts_settings(&settings)?;
        Ok(settings)
    }
}
