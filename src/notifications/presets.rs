//! Ready-made notification presets
//!
//! Operators can start from one of these instead of a blank record.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::types::NotificationRecord;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize)]
pub struct PresetCategory {
    pub key: &'static str,
    pub label: &'static str,
    pub presets: Vec<Preset>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub title: &'static str,
    pub mobile_title: &'static str,
    pub cta_text: &'static str,
    pub cta_url: &'static str,
    pub secondary_text: &'static str,
    pub bg_color: &'static str,
    pub text_color: &'static str,
    pub cta_bg_color: &'static str,
    pub secondary_bg_color: &'static str,
}

impl Preset {
    /// A new enabled record carrying the preset's copy and colors
    pub fn to_record(&self) -> NotificationRecord {
        NotificationRecord {
            title: self.title.to_string(),
            mobile_title: self.mobile_title.to_string(),
            cta_text: self.cta_text.to_string(),
            cta_url: self.cta_url.to_string(),
            secondary_text: self.secondary_text.to_string(),
            bg_color: self.bg_color.to_string(),
            text_color: self.text_color.to_string(),
            cta_bg_color: self.cta_bg_color.to_string(),
            secondary_bg_color: self.secondary_bg_color.to_string(),
            ..NotificationRecord::default()
        }
    }
}

const fn preset(
    name: &'static str,
    title: &'static str,
    mobile_title: &'static str,
    cta_text: &'static str,
    secondary_text: &'static str,
    colors: [&'static str; 4],
) -> Preset {
    Preset {
        name,
        title,
        mobile_title,
        cta_text,
        cta_url: "/",
        secondary_text,
        bg_color: colors[0],
        text_color: colors[1],
        cta_bg_color: colors[2],
        secondary_bg_color: colors[3],
    }
}

const SLATE: [&str; 4] = ["#0f172a", "#ffffff", "#10b981", "#1f2937"];
const INDIGO: [&str; 4] = ["#6366f1", "#ffffff", "#10b981", "#4f46e5"];
const RED: [&str; 4] = ["#dc2626", "#ffffff", "#fbbf24", "#991b1b"];
const GREEN: [&str; 4] = ["#059669", "#ffffff", "#fbbf24", "#047857"];
const VIOLET: [&str; 4] = ["#7c3aed", "#ffffff", "#10b981", "#5b21b6"];
const BLUE: [&str; 4] = ["#2563eb", "#ffffff", "#fbbf24", "#1d4ed8"];

static CATALOG: Lazy<Vec<PresetCategory>> = Lazy::new(|| {
    vec![
        PresetCategory {
            key: "products",
            label: "Products & Launches",
            presets: vec![
                preset("New Product Launch", "NEW: Our latest release is here. See what it can do for your site!", "NEW release is here!", "Get It Now", "View Demo", INDIGO),
                preset("Flagship Feature", "Trusted by thousands of sites worldwide. Discover our flagship product.", "Trusted by thousands!", "Explore", "See Demos", SLATE),
                preset("Product Bundle", "Complete Bundle: every premium product in one package. Save 60% today only!", "Bundle: save 60%!", "Get Bundle", "See What's Included", RED),
            ],
        },
        PresetCategory {
            key: "freebies",
            label: "Free Goodies",
            presets: vec![
                preset("Free Download of the Month", "FREE this month: grab our featured download before it's gone!", "FREE download, grab now!", "Download Free", "Learn More", GREEN),
                preset("Free Resource Pack", "FREE resource pack: 50 ready-to-use snippets to customize your site.", "FREE 50 snippets!", "Download Now", "", VIOLET),
            ],
        },
        PresetCategory {
            key: "events",
            label: "Events & Meetups",
            presets: vec![
                preset("Conference Booth", "Meet us at the conference. Visit our booth for exclusive discounts!", "Meet us at the conference!", "Event Details", "", BLUE),
                preset("Free Webinar", "FREE live webinar: growing an engaged community. Save your seat!", "FREE webinar, register!", "Register Free", "Past Recordings", VIOLET),
                preset("Community Meetup", "Join our monthly online meetup and connect with other site builders.", "Monthly meetup, join us!", "Join Meetup", "", SLATE),
            ],
        },
        PresetCategory {
            key: "sales",
            label: "Sales & Discounts",
            presets: vec![
                preset("Black Friday Sale", "BLACK FRIDAY: up to 70% off everything. Biggest sale of the year!", "Black Friday: 70% off!", "Shop the Sale", "View Deals", ["#111827", "#ffffff", "#f59e0b", "#374151"]),
                preset("Limited Time Offer", "48 hours only: 40% off all annual plans. Don't miss out!", "48h only: 40% off!", "Claim Discount", "", RED),
                preset("Renewal Discount", "Renew your license today and keep 30% off for life.", "Renew: 30% off!", "Renew Now", "", GREEN),
            ],
        },
        PresetCategory {
            key: "community",
            label: "Community & Support",
            presets: vec![
                preset("Join the Community", "Join thousands of site owners in our community group. Ask, share, learn!", "Join our community!", "Join Group", "", BLUE),
                preset("Get Support", "Need help? Our support team answers within one business day.", "Need help? Ask us!", "Open a Ticket", "Read the Docs", SLATE),
            ],
        },
    ]
});

pub fn catalog() -> &'static [PresetCategory] {
    &CATALOG
}

/// Look a preset up by its display name, case-insensitively
pub fn find(name: &str) -> AppResult<&'static Preset> {
    CATALOG
        .iter()
        .flat_map(|category| category.presets.iter())
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| AppError::PresetNotFound { name: name.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::sanitizer::{sanitize_hex_color, sanitize_text_field};

    #[test]
    fn test_find_is_case_insensitive() {
        let preset = find("black friday sale").unwrap();
        assert_eq!(preset.name, "Black Friday Sale");
        assert!(matches!(find("nope"), Err(AppError::PresetNotFound { .. })));
    }

    #[test]
    fn test_presets_produce_clean_records() {
        for preset in catalog().iter().flat_map(|c| c.presets.iter()) {
            let record = preset.to_record();
            assert!(record.enabled);
            assert!(record.has_title(), "{} has no title", preset.name);
            assert_eq!(sanitize_text_field(&record.title), record.title);
            for color in [&record.bg_color, &record.text_color, &record.cta_bg_color, &record.secondary_bg_color] {
                assert_eq!(&sanitize_hex_color(color, "#000000"), color);
            }
        }
    }
}
