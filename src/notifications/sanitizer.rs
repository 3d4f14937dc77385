//! Save-time sanitization of submitted notifications
//!
//! Every problem found here is corrected silently: a bad color falls back to
//! the field default, a bad URL becomes empty, an unknown enum value becomes
//! the default, and an entry without a title is dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::types::{
    NotificationRecord, Position, ShowOn, DEFAULT_BG_COLOR, DEFAULT_CTA_BG_COLOR,
    DEFAULT_SECONDARY_BG_COLOR, DEFAULT_TEXT_COLOR,
};

/// One notification entry as submitted by the settings form
///
/// Text fields are optional. Checkbox fields follow form semantics: an
/// absent (or null) field means the box was unchecked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNotification {
    pub enabled: Option<Value>,
    pub title: Option<String>,
    pub mobile_title: Option<String>,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub secondary_text: Option<String>,
    pub secondary_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub dismissible: Option<Value>,
    pub position: Option<String>,
    pub show_on: Option<String>,
    pub hide_for_logged_in: Option<Value>,
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub cta_bg_color: Option<String>,
    pub secondary_bg_color: Option<String>,
}

impl From<&NotificationRecord> for RawNotification {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            enabled: Some(Value::Bool(record.enabled)),
            title: Some(record.title.clone()),
            mobile_title: Some(record.mobile_title.clone()),
            cta_text: Some(record.cta_text.clone()),
            cta_url: Some(record.cta_url.clone()),
            secondary_text: Some(record.secondary_text.clone()),
            secondary_url: Some(record.secondary_url.clone()),
            start_date: Some(record.start_date.clone()),
            end_date: Some(record.end_date.clone()),
            dismissible: Some(Value::Bool(record.dismissible)),
            position: Some(record.position.as_str().to_string()),
            show_on: Some(record.show_on.as_str().to_string()),
            hide_for_logged_in: Some(Value::Bool(record.hide_for_logged_in)),
            bg_color: Some(record.bg_color.clone()),
            text_color: Some(record.text_color.clone()),
            cta_bg_color: Some(record.cta_bg_color.clone()),
            secondary_bg_color: Some(record.secondary_bg_color.clone()),
        }
    }
}

/// Trait for notification sanitizers
///
/// Turns an untrusted form entry into a storable record, or `None` when
/// the entry must be dropped.
pub trait NotificationSanitizer: Send + Sync {
    fn sanitize(&self, raw: &RawNotification) -> Option<NotificationRecord>;

    /// Sanitize a whole submission, keeping order and at most `max` records
    fn sanitize_all(&self, raws: &[RawNotification], max: usize) -> Vec<NotificationRecord> {
        let mut records: Vec<NotificationRecord> =
            raws.iter().filter_map(|raw| self.sanitize(raw)).collect();

        if records.len() > max {
            warn!(
                "Submission has {} notifications, keeping the first {}",
                records.len(),
                max
            );
            records.truncate(max);
        }

        records
    }
}

/// Default implementation of NotificationSanitizer
#[derive(Debug, Clone, Default)]
pub struct DefaultNotificationSanitizer;

impl DefaultNotificationSanitizer {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSanitizer for DefaultNotificationSanitizer {
    fn sanitize(&self, raw: &RawNotification) -> Option<NotificationRecord> {
        let text = |field: &Option<String>| sanitize_text_field(field.as_deref().unwrap_or(""));
        let url = |field: &Option<String>| sanitize_url(field.as_deref().unwrap_or(""));
        let color = |field: &Option<String>, default: &str| {
            sanitize_hex_color(field.as_deref().unwrap_or(""), default)
        };

        let record = NotificationRecord {
            enabled: is_checked(&raw.enabled),
            title: text(&raw.title),
            mobile_title: text(&raw.mobile_title),
            cta_text: text(&raw.cta_text),
            cta_url: url(&raw.cta_url),
            secondary_text: text(&raw.secondary_text),
            secondary_url: url(&raw.secondary_url),
            start_date: text(&raw.start_date),
            end_date: text(&raw.end_date),
            dismissible: is_checked(&raw.dismissible),
            position: parse_position(raw.position.as_deref()),
            show_on: parse_show_on(raw.show_on.as_deref()),
            hide_for_logged_in: is_checked(&raw.hide_for_logged_in),
            bg_color: color(&raw.bg_color, DEFAULT_BG_COLOR),
            text_color: color(&raw.text_color, DEFAULT_TEXT_COLOR),
            cta_bg_color: color(&raw.cta_bg_color, DEFAULT_CTA_BG_COLOR),
            secondary_bg_color: color(&raw.secondary_bg_color, DEFAULT_SECONDARY_BG_COLOR),
        };

        if record.title.is_empty() {
            debug!("Dropping submitted notification without a title");
            return None;
        }

        Some(record)
    }
}

/// Checkbox semantics for a submitted field
pub(crate) fn is_checked(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("off"))
        }
        Some(_) => true,
    }
}

fn parse_position(value: Option<&str>) -> Position {
    match value {
        Some("top") => Position::Top,
        _ => Position::Bottom,
    }
}

fn parse_show_on(value: Option<&str>) -> ShowOn {
    match value {
        Some("homepage") => ShowOn::Homepage,
        Some("posts") => ShowOn::Posts,
        Some("pages") => ShowOn::Pages,
        _ => ShowOn::All,
    }
}

/// Validate a hex color, returning it lowercased with a leading `#`, or
/// `default` when it is empty or malformed
pub fn sanitize_hex_color(color: &str, default: &str) -> String {
    let color = color.trim();
    if color.is_empty() {
        return default.to_string();
    }

    let digits = color.strip_prefix('#').unwrap_or(color);
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        format!("#{}", digits.to_ascii_lowercase())
    } else {
        default.to_string()
    }
}

/// Plain single-line text: tags stripped, whitespace collapsed, trimmed
///
/// A `<` that cannot start a tag, as in `3 < 5`, is kept.
pub fn sanitize_text_field(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            _ if in_tag => in_tag = c != '>',
            // A `<` only opens a tag when markup could follow it
            '<' if chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?')) =>
            {
                in_tag = true
            }
            c if c.is_control() => stripped.push(' '),
            c => stripped.push(c),
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accept http(s) URLs and site-relative paths; anything else becomes empty
///
/// A bare host such as `example.com/sale` is assumed to be `http://`.
pub fn sanitize_url(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() || input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return String::new();
    }

    if input.starts_with('/') && !input.starts_with("//") {
        return input.to_string();
    }

    let parsed = match Url::parse(input) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{input}")).ok(),
        Err(_) => None,
    };

    match parsed {
        Some(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => url.to_string(),
        _ => String::new(),
    }
}
