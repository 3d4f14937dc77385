//! Type definitions for notification records
//!
//! This module contains the stored notification record, its enums, the
//! per-request context the eligibility filter evaluates against, and the
//! tracking-scripts settings record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

pub const DEFAULT_BG_COLOR: &str = "#0f172a";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_CTA_BG_COLOR: &str = "#10b981";
pub const DEFAULT_SECONDARY_BG_COLOR: &str = "#1f2937";

/// A single promotional notification as stored
///
/// Field order is significant: the dismissal fingerprint hashes the JSON
/// serialization, so reordering fields invalidates every dismissal cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationRecord {
    pub enabled: bool,
    pub title: String,
    pub mobile_title: String,
    pub cta_text: String,
    pub cta_url: String,
    pub secondary_text: String,
    pub secondary_url: String,
    /// `YYYY-MM-DD`, empty when unscheduled
    pub start_date: String,
    /// `YYYY-MM-DD`, inclusive through 23:59:59
    pub end_date: String,
    pub dismissible: bool,
    pub position: Position,
    pub show_on: ShowOn,
    pub hide_for_logged_in: bool,
    pub bg_color: String,
    pub text_color: String,
    pub cta_bg_color: String,
    pub secondary_bg_color: String,
}

impl Default for NotificationRecord {
    fn default() -> Self {
        Self {
            enabled: true,
            title: String::new(),
            mobile_title: String::new(),
            cta_text: String::new(),
            cta_url: String::new(),
            secondary_text: String::new(),
            secondary_url: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            dismissible: true,
            position: Position::default(),
            show_on: ShowOn::default(),
            hide_for_logged_in: false,
            bg_color: DEFAULT_BG_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            cta_bg_color: DEFAULT_CTA_BG_COLOR.to_string(),
            secondary_bg_color: DEFAULT_SECONDARY_BG_COLOR.to_string(),
        }
    }
}

impl NotificationRecord {
    /// Create an enabled record with the given title and every other field
    /// at its default
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// A primary button needs both a label and a target
    pub fn has_cta(&self) -> bool {
        !self.cta_text.is_empty() && !self.cta_url.is_empty()
    }

    pub fn has_secondary(&self) -> bool {
        !self.secondary_text.is_empty() && !self.secondary_url.is_empty()
    }
}

/// Where the bar is pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    #[default]
    #[serde(other)]
    Bottom,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Bottom => "bottom",
        }
    }
}

/// Which kind of page a notification is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowOn {
    Homepage,
    Posts,
    Pages,
    #[default]
    #[serde(other)]
    All,
}

impl ShowOn {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShowOn::All => "all",
            ShowOn::Homepage => "homepage",
            ShowOn::Posts => "posts",
            ShowOn::Pages => "pages",
        }
    }

    /// Whether a page of the given type satisfies this rule
    pub fn matches(&self, page_type: PageType) -> bool {
        match self {
            ShowOn::All => true,
            ShowOn::Homepage => page_type == PageType::Home,
            ShowOn::Posts => page_type == PageType::Post,
            ShowOn::Pages => page_type == PageType::Page,
        }
    }
}

/// The kind of page currently being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Home,
    Post,
    Page,
    #[default]
    Other,
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageType::Home => "home",
            PageType::Post => "post",
            PageType::Page => "page",
            PageType::Other => "other",
        };
        f.write_str(name)
    }
}

impl FromStr for PageType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "homepage" | "front" => Ok(PageType::Home),
            "post" | "single" => Ok(PageType::Post),
            "page" => Ok(PageType::Page),
            "other" => Ok(PageType::Other),
            other => Err(AppError::validation(
                "page_type",
                format!("expected home, post, page or other, got '{other}'"),
            )),
        }
    }
}

/// Visitor-side facts the display rules depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub is_logged_in: bool,
    pub page_type: PageType,
}

impl RequestContext {
    pub fn new(is_logged_in: bool, page_type: PageType) -> Self {
        Self { is_logged_in, page_type }
    }
}

/// Custom header and footer code injected on every public page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsSettings {
    pub header_code: HeaderCode,
    pub footer_code: FooterCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderCode {
    pub enabled: bool,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterCode {
    pub enabled: bool,
    pub code: String,
    pub priority: FooterPriority,
}

impl Default for FooterCode {
    fn default() -> Self {
        Self {
            enabled: false,
            code: String::new(),
            priority: FooterPriority::AfterNotifications,
        }
    }
}

/// Footer code runs either before (5) or after (15) the notification bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum FooterPriority {
    BeforeNotifications,
    #[default]
    AfterNotifications,
}

impl From<u8> for FooterPriority {
    fn from(value: u8) -> Self {
        match value {
            5 => FooterPriority::BeforeNotifications,
            _ => FooterPriority::AfterNotifications,
        }
    }
}

impl From<FooterPriority> for u8 {
    fn from(value: FooterPriority) -> Self {
        match value {
            FooterPriority::BeforeNotifications => 5,
            FooterPriority::AfterNotifications => 15,
        }
    }
}
