//! Dismissal gate
//!
//! A dismissed notification is remembered by the visitor's browser in a
//! cookie named after the notification's content fingerprint. Editing any
//! field of a notification changes the fingerprint, which makes earlier
//! dismissals stop matching.

use std::collections::HashMap;

use super::types::NotificationRecord;

pub const DISMISS_COOKIE_PREFIX: &str = "pfb_dismissed_";
pub const DISMISS_COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Lowercase hex MD5 of the record's JSON serialization
pub fn fingerprint(record: &NotificationRecord) -> String {
    // Serializing a struct of strings, bools and unit enums cannot fail
    let canonical = serde_json::to_string(record).unwrap_or_default();
    format!("{:x}", md5::compute(canonical.as_bytes()))
}

pub fn cookie_name(record: &NotificationRecord) -> String {
    format!("{DISMISS_COOKIE_PREFIX}{}", fingerprint(record))
}

/// `Set-Cookie` value equivalent to what the dismissal script writes
pub fn dismissal_set_cookie(record: &NotificationRecord) -> String {
    format!(
        "{}=1; Max-Age={}; Path=/; SameSite=Lax",
        cookie_name(record),
        DISMISS_COOKIE_MAX_AGE_SECS
    )
}

/// Cookies sent with the current request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` request header (`a=1; b=2`)
    ///
    /// Pairs without `=` or with an empty name are skipped; the first
    /// occurrence of a name wins.
    pub fn from_header(header: &str) -> Self {
        let mut cookies = HashMap::new();

        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"');
            cookies
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }

        Self { cookies }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Whether the visitor has dismissed this exact version of the record
///
/// Non-dismissible records are never considered dismissed.
pub fn is_dismissed(record: &NotificationRecord, jar: &CookieJar) -> bool {
    record.dismissible && jar.contains(&cookie_name(record))
}
