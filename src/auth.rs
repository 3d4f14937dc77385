//! Authorization for the admin save path
//!
//! A save is accepted only from a principal holding `manage_options` that
//! also presents a nonce minted for the same action and user.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::warn;

use crate::config::SecurityConfig;
use crate::errors::{AppError, AppResult};

pub const SAVE_NOTIFICATIONS_ACTION: &str = "pfb_save_notifications";
pub const SAVE_SCRIPTS_ACTION: &str = "pfb_save_scripts";

const NONCE_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageOptions,
    /// May store raw HTML and scripts
    UnfilteredHtml,
}

/// The user a save is performed on behalf of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: u64,
    capabilities: HashSet<Capability>,
}

impl Principal {
    pub fn new(user_id: u64, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            user_id,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// The local operator running the CLI
    pub fn operator() -> Self {
        Self::new(1, [Capability::ManageOptions, Capability::UnfilteredHtml])
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn require(&self, capability: Capability, action: &str) -> AppResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            warn!("User {} lacks {:?} for '{}'", self.user_id, capability, action);
            Err(AppError::PermissionDenied { action: action.to_string() })
        }
    }
}

/// Mints and checks time-limited action nonces
///
/// Time is split into ticks of half the lifetime; a nonce is accepted
/// during the tick it was minted in and the one after.
#[derive(Debug, Clone)]
pub struct NonceVerifier {
    secret: String,
    lifetime_secs: u64,
}

impl NonceVerifier {
    pub fn new(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs: lifetime_secs.max(2),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.nonce_secret.clone(), config.nonce_lifetime_secs)
    }

    pub fn create(&self, action: &str, user_id: u64) -> String {
        self.create_at(action, user_id, Utc::now().timestamp())
    }

    pub fn create_at(&self, action: &str, user_id: u64, unix_secs: i64) -> String {
        self.digest(action, user_id, self.tick(unix_secs))
    }

    pub fn verify(&self, nonce: &str, action: &str, user_id: u64) -> AppResult<()> {
        self.verify_at(nonce, action, user_id, Utc::now().timestamp())
    }

    pub fn verify_at(&self, nonce: &str, action: &str, user_id: u64, unix_secs: i64) -> AppResult<()> {
        let tick = self.tick(unix_secs);
        let accepted = !nonce.is_empty()
            && [tick, tick - 1]
                .iter()
                .any(|t| self.digest(action, user_id, *t) == nonce);

        if accepted {
            Ok(())
        } else {
            warn!("Rejected nonce for '{}' from user {}", action, user_id);
            Err(AppError::SecurityCheckFailed { action: action.to_string() })
        }
    }

    fn tick(&self, unix_secs: i64) -> i64 {
        let half = i64::try_from(self.lifetime_secs / 2).unwrap_or(i64::MAX);
        unix_secs.div_euclid(half)
    }

    fn digest(&self, action: &str, user_id: u64, tick: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}|{}|{}|{}", self.secret, action, user_id, tick).as_bytes());
        let mut hex = format!("{:x}", hasher.finalize());
        hex.truncate(NONCE_LENGTH);
        hex
    }
}

/// Nonce check first, then the `manage_options` capability
pub fn authorize_save(
    verifier: &NonceVerifier,
    principal: &Principal,
    nonce: Option<&str>,
    action: &str,
) -> AppResult<()> {
    let nonce = nonce.ok_or_else(|| {
        warn!("Missing nonce for '{}'", action);
        AppError::SecurityCheckFailed { action: action.to_string() }
    })?;
    verifier.verify(nonce, action, principal.user_id)?;
    principal.require(Capability::ManageOptions, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    fn verifier() -> NonceVerifier {
        NonceVerifier::new("test-secret", DAY)
    }

    #[test]
    fn test_nonce_shape() {
        let nonce = verifier().create_at(SAVE_NOTIFICATIONS_ACTION, 1, 1_700_000_000);
        assert_eq!(nonce.len(), 10);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_nonce_valid_for_current_and_next_tick() {
        let verifier = verifier();
        let minted_at = 1_700_000_000;
        let nonce = verifier.create_at(SAVE_NOTIFICATIONS_ACTION, 1, minted_at);

        let half = (DAY / 2) as i64;
        assert!(verifier.verify_at(&nonce, SAVE_NOTIFICATIONS_ACTION, 1, minted_at).is_ok());
        assert!(verifier.verify_at(&nonce, SAVE_NOTIFICATIONS_ACTION, 1, minted_at + half).is_ok());
        assert!(verifier
            .verify_at(&nonce, SAVE_NOTIFICATIONS_ACTION, 1, minted_at + 2 * half + half)
            .is_err());
    }

    #[test]
    fn test_nonce_bound_to_action_user_and_secret() {
        let verifier = verifier();
        let now = 1_700_000_000;
        let nonce = verifier.create_at(SAVE_NOTIFICATIONS_ACTION, 1, now);

        assert!(verifier.verify_at(&nonce, SAVE_SCRIPTS_ACTION, 1, now).is_err());
        assert!(verifier.verify_at(&nonce, SAVE_NOTIFICATIONS_ACTION, 2, now).is_err());
        assert!(NonceVerifier::new("other", DAY)
            .verify_at(&nonce, SAVE_NOTIFICATIONS_ACTION, 1, now)
            .is_err());
        assert!(verifier.verify_at("", SAVE_NOTIFICATIONS_ACTION, 1, now).is_err());
    }

    #[test]
    fn test_authorize_save() {
        let verifier = verifier();
        let operator = Principal::operator();
        let nonce = verifier.create(SAVE_NOTIFICATIONS_ACTION, operator.user_id);

        assert!(authorize_save(&verifier, &operator, Some(&nonce), SAVE_NOTIFICATIONS_ACTION).is_ok());

        let missing = authorize_save(&verifier, &operator, None, SAVE_NOTIFICATIONS_ACTION);
        assert!(matches!(missing, Err(AppError::SecurityCheckFailed { .. })));

        let editor = Principal::new(1, [Capability::UnfilteredHtml]);
        let denied = authorize_save(&verifier, &editor, Some(&nonce), SAVE_NOTIFICATIONS_ACTION);
        assert!(matches!(denied, Err(AppError::PermissionDenied { .. })));
    }
}
