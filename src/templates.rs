//! Footer bar markup
//!
//! The selected notification is rendered through a handlebars template
//! into one `#pfb-sticky-footer` region followed by its stylesheet and,
//! for dismissible notifications, the dismissal script.

use handlebars::Handlebars;
use serde_json::{json, Value};
use url::Url;

use crate::errors::{AppError, AppResult};
use crate::notifications::dismissal;
use crate::notifications::sanitizer::sanitize_hex_color;
use crate::notifications::types::{
    DEFAULT_BG_COLOR, DEFAULT_CTA_BG_COLOR, DEFAULT_SECONDARY_BG_COLOR, DEFAULT_TEXT_COLOR,
};
use crate::notifications::{NotificationRecord, Position};

pub const FOOTER_TEMPLATE_NAME: &str = "footer_bar";

pub const UTM_PARAMS: &[(&str, &str)] = &[
    ("utm_source", "sitewide-notice"),
    ("utm_medium", "sticky-footer"),
    ("utm_campaign", "footer-notification"),
];

const DISMISS_SCRIPT: &str = include_str!("../assets/dismiss.js");

const CLOSE_ICON_PATH: &str = "M12.854 3.646a.5.5 0 0 0-.708-.708L8 7.293 3.854 3.146a.5.5 0 1 0-.708.708L7.293 8l-4.147 4.146a.5.5 0 0 0 .708.708L8 8.707l4.146 4.147a.5.5 0 0 0 .708-.708L8.707 8l4.147-4.146z";

const FOOTER_TEMPLATE: &str = r#"<!-- Promotional Footer Bar -->
<div id="pfb-sticky-footer" role="region" aria-label="Promotional notification" data-cookie="{{cookie_name}}">
  <span class="pfb-promo-text pfb-desktop-text">{{title}}</span>
{{#if mobile_title}}
  <span class="pfb-promo-text pfb-mobile-text">{{mobile_title}}</span>
{{/if}}
  <div class="pfb-footer-actions">
{{#if cta_url}}
    <a class="pfb-footer-cta" href="{{cta_url}}">{{cta_text}}</a>
{{/if}}
{{#if secondary_url}}
    <a class="pfb-footer-link" href="{{secondary_url}}">{{secondary_text}}</a>
{{/if}}
  </div>
{{#if dismissible}}
  <button class="pfb-close" aria-label="Close notification" title="Close">
    <svg width="16" height="16" viewBox="0 0 16 16" fill="none"><path d="{{close_icon}}" fill="currentColor"/></svg>
  </button>
{{/if}}
</div>
<style>
#pfb-sticky-footer {
  position: fixed; {{position}}: 0; left: 0; right: 0;
  background: {{bg_color}};
  color: {{text_color}};
  padding: .7rem 1rem;
  font: 500 15px/1.4 system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif;
  z-index: 99999;
  display: flex; flex-wrap: wrap;
  justify-content: center; align-items: center; gap: .75rem 1rem;
  text-align: center;
  box-shadow: {{shadow}};
}
.pfb-promo-text { margin: 0; }
.pfb-desktop-text { display: inline; }
.pfb-mobile-text { display: none; }
.pfb-footer-actions { display: inline-flex; gap: .6rem; align-items: center; flex: 0 0 auto; }
.pfb-close {
  background: transparent; border: none; cursor: pointer;
  color: {{text_color}};
  padding: .25rem; margin-left: .5rem;
  opacity: .7; transition: opacity .2s ease;
  display: inline-flex; align-items: center;
}
.pfb-close:hover { opacity: 1; }
#pfb-sticky-footer .pfb-footer-cta,
#pfb-sticky-footer a.pfb-footer-link {
  display: inline-flex; align-items: center; justify-content: center;
  padding: .48rem 1.2rem; border-radius: 8px; line-height: 1;
  text-decoration: none !important;
  color: #ffffff !important;
  transition: transform .15s ease, opacity .2s ease;
}
#pfb-sticky-footer .pfb-footer-cta { font-weight: 700; border: none; background: {{cta_bg_color}}; }
#pfb-sticky-footer a.pfb-footer-link { font-weight: 600; border: 1px solid rgba(255,255,255,.12); background: {{secondary_bg_color}}; }
#pfb-sticky-footer .pfb-footer-cta:hover,
#pfb-sticky-footer a.pfb-footer-link:hover { opacity: .9; }
#pfb-sticky-footer .pfb-footer-cta:focus,
#pfb-sticky-footer a.pfb-footer-link:focus { outline: 2px solid {{text_color}}; outline-offset: 2px; }
@media (max-width: 600px) {
  #pfb-sticky-footer { font-size: 14px; flex-direction: column; padding: .6rem 1rem; }
  .pfb-desktop-text { display: none; }
  .pfb-mobile-text { display: inline; }
  .pfb-footer-actions { width: 100%; }
  #pfb-sticky-footer .pfb-footer-cta,
  #pfb-sticky-footer a.pfb-footer-link { flex: 1 1 auto; text-align: center; }
}
</style>
{{#if dismissible}}
<script>
{{{dismiss_script}}}
</script>
{{/if}}
"#;

/// Renders a resolved notification to HTML
#[derive(Debug, Clone)]
pub struct FooterRenderer {
    handlebars: Handlebars<'static>,
}

impl FooterRenderer {
    pub fn new() -> AppResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(escape_html);
        handlebars.register_template_string(FOOTER_TEMPLATE_NAME, FOOTER_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    pub fn render(&self, record: &NotificationRecord) -> AppResult<String> {
        let context = Self::context(record);
        self.handlebars
            .render(FOOTER_TEMPLATE_NAME, &context)
            .map_err(|e| AppError::TemplateRendering {
                template_name: FOOTER_TEMPLATE_NAME.to_string(),
                source: Some(Box::new(e)),
            })
    }

    /// Template data for one record
    ///
    /// Links without a label or a target are left out entirely. Colors are
    /// checked again here because stored records are not guaranteed to
    /// have passed the save path.
    pub fn context(record: &NotificationRecord) -> Value {
        let cta_url = if record.has_cta() { add_utm_params(&record.cta_url) } else { String::new() };
        let secondary_url = if record.has_secondary() {
            add_utm_params(&record.secondary_url)
        } else {
            String::new()
        };
        let shadow = match record.position {
            Position::Top => "0 2px 8px rgba(0,0,0,.15)",
            Position::Bottom => "0 -2px 8px rgba(0,0,0,.15)",
        };

        json!({
            "cookie_name": dismissal::cookie_name(record),
            "title": record.title,
            "mobile_title": record.mobile_title,
            "cta_text": record.cta_text,
            "cta_url": cta_url,
            "secondary_text": record.secondary_text,
            "secondary_url": secondary_url,
            "dismissible": record.dismissible,
            "position": record.position.as_str(),
            "shadow": shadow,
            "bg_color": sanitize_hex_color(&record.bg_color, DEFAULT_BG_COLOR),
            "text_color": sanitize_hex_color(&record.text_color, DEFAULT_TEXT_COLOR),
            "cta_bg_color": sanitize_hex_color(&record.cta_bg_color, DEFAULT_CTA_BG_COLOR),
            "secondary_bg_color": sanitize_hex_color(&record.secondary_bg_color, DEFAULT_SECONDARY_BG_COLOR),
            "close_icon": CLOSE_ICON_PATH,
            "dismiss_script": DISMISS_SCRIPT,
        })
    }
}

/// Escapes markup characters but leaves `=` and backticks alone, so query
/// strings in `href` values stay readable
fn escape_html(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Append the campaign parameters, replacing any existing values for them
///
/// Site-relative URLs stay relative. An empty URL stays empty.
pub fn add_utm_params(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    match Url::parse(url) {
        Ok(parsed) => with_utm(parsed).to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let joined = Url::parse("http://localhost/")
                .and_then(|base| base.join(url));
            match joined {
                Ok(absolute) => with_utm(absolute)[url::Position::BeforePath..].to_string(),
                Err(_) => url.to_string(),
            }
        }
        Err(_) => url.to_string(),
    }
}

fn with_utm(mut url: Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !UTM_PARAMS.iter().any(|(utm, _)| *utm == &**key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .extend_pairs(UTM_PARAMS);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> FooterRenderer {
        FooterRenderer::new().unwrap()
    }

    #[test]
    fn test_utm_params_appended() {
        assert_eq!(
            add_utm_params("https://example.com/sale"),
            "https://example.com/sale?utm_source=sitewide-notice&utm_medium=sticky-footer&utm_campaign=footer-notification"
        );
        assert_eq!(add_utm_params(""), "");
    }

    #[test]
    fn test_utm_params_replace_existing_keys() {
        let url = add_utm_params("https://example.com/?ref=a&utm_source=old#top");
        assert_eq!(
            url,
            "https://example.com/?ref=a&utm_source=sitewide-notice&utm_medium=sticky-footer&utm_campaign=footer-notification#top"
        );
    }

    #[test]
    fn test_utm_params_keep_relative_urls_relative() {
        assert_eq!(
            add_utm_params("/pricing?plan=pro"),
            "/pricing?plan=pro&utm_source=sitewide-notice&utm_medium=sticky-footer&utm_campaign=footer-notification"
        );
    }

    #[test]
    fn test_render_full_notification() {
        let record = NotificationRecord {
            mobile_title: "Short".into(),
            cta_text: "Shop".into(),
            cta_url: "https://example.com/shop".into(),
            secondary_text: "Details".into(),
            secondary_url: "https://example.com/info".into(),
            position: Position::Top,
            ..NotificationRecord::titled("Winter <Sale>")
        };
        let html = renderer().render(&record).unwrap();

        assert!(html.contains("id=\"pfb-sticky-footer\""));
        assert!(html.contains(&format!("data-cookie=\"{}\"", dismissal::cookie_name(&record))));
        assert!(html.contains("Winter &lt;Sale&gt;"));
        assert!(html.contains("pfb-mobile-text\">Short<"));
        assert!(html.contains("href=\"https://example.com/shop?utm_source=sitewide-notice&amp;utm_medium=sticky-footer&amp;utm_campaign=footer-notification\""));
        assert!(html.contains("class=\"pfb-footer-link\""));
        assert!(html.contains("position: fixed; top: 0;"));
        assert!(html.contains("class=\"pfb-close\""));
        assert!(html.contains("data-cookie"));
        assert!(html.contains("SameSite=Lax"));
    }

    #[test]
    fn test_render_minimal_notification() {
        let record = NotificationRecord {
            dismissible: false,
            cta_text: "Shop".into(),
            ..NotificationRecord::titled("Plain")
        };
        let html = renderer().render(&record).unwrap();

        assert!(html.contains("position: fixed; bottom: 0;"));
        assert!(!html.contains("pfb-mobile-text\">"));
        assert!(!html.contains("class=\"pfb-footer-cta\""));
        assert!(!html.contains("class=\"pfb-close\""));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_stored_colors_fall_back_to_defaults() {
        let record = NotificationRecord {
            bg_color: String::new(),
            text_color: "red;position:static".into(),
            cta_bg_color: "#ABC".into(),
            ..NotificationRecord::titled("Tampered")
        };
        let html = renderer().render(&record).unwrap();

        assert!(html.contains(&format!("background: {DEFAULT_BG_COLOR};")));
        assert!(html.contains(&format!("color: {DEFAULT_TEXT_COLOR};")));
        assert!(html.contains("background: #abc;"));
        assert!(!html.contains("position:static"));
        assert!(!html.contains("background: ;"));
    }

    #[test]
    fn test_query_separator_survives_escaping() {
        assert_eq!(escape_html("a=1&b=`x`"), "a=1&amp;b=`x`");
        assert_eq!(escape_html("<'\">"), "&lt;&#x27;&quot;&gt;");
    }

    #[test]
    fn test_dismiss_script_matches_cookie_contract() {
        let html = renderer().render(&NotificationRecord::titled("Closable")).unwrap();

        assert!(html.contains(&format!(
            "MAX_AGE_SECS = {};",
            dismissal::DISMISS_COOKIE_MAX_AGE_SECS
        )));
        assert!(html.contains("'=1; max-age='"));
        assert!(html.contains("path=/; SameSite=Lax"));
        assert!(!html.contains("expires="));
    }
}
