//! Visitor-facing engine
//!
//! Ties the repository, eligibility filter, selector, dismissal gate and
//! renderer together for one page view. Nothing on this path returns an
//! error to the caller: failures are logged and the page simply gets no
//! banner.

use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::AppResult;
use crate::notifications::types::FooterPriority;
use crate::notifications::{dismissal, eligibility, selector};
use crate::notifications::{CookieJar, NotificationRecord, RequestContext};
use crate::scripts;
use crate::storage::NotificationRepository;
use crate::templates::FooterRenderer;

/// Everything the engine needs to know about the current request
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Site-local wall clock
    pub now: NaiveDateTime,
    pub context: RequestContext,
    pub cookies: CookieJar,
    /// Admin screens never get a banner or injected code
    pub is_admin: bool,
}

impl PageRequest {
    pub fn new(context: RequestContext) -> Self {
        Self {
            now: Local::now().naive_local(),
            context,
            cookies: CookieJar::new(),
            is_admin: false,
        }
    }

    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn with_cookies(mut self, cookies: CookieJar) -> Self {
        self.cookies = cookies;
        self
    }
}

/// Markup to splice into a public page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFragments {
    /// Goes before `</head>`
    pub head: String,
    /// Goes before `</body>`
    pub footer: String,
}

pub struct FooterBar {
    repository: Arc<NotificationRepository>,
    renderer: FooterRenderer,
    reroll_dismissed: bool,
}

impl FooterBar {
    pub fn new(repository: Arc<NotificationRepository>, renderer: FooterRenderer) -> Self {
        Self {
            repository,
            renderer,
            reroll_dismissed: false,
        }
    }

    /// Draw again among the remaining candidates when the pick was dismissed
    pub fn with_reroll_dismissed(mut self, reroll: bool) -> Self {
        self.reroll_dismissed = reroll;
        self
    }

    pub fn repository(&self) -> &Arc<NotificationRepository> {
        &self.repository
    }

    /// Notifications that may be shown for this request, in stored order
    pub fn eligible(&self, request: &PageRequest) -> AppResult<Vec<NotificationRecord>> {
        let enabled = self.repository.enabled()?;
        let eligible = eligibility::filter(&enabled, request.now, &request.context);
        debug!(
            "{} of {} enabled notifications eligible for {} page",
            eligible.len(),
            enabled.len(),
            request.context.page_type
        );
        Ok(eligible)
    }

    /// The notification to show, or `None`
    ///
    /// A pick the visitor already dismissed yields `None` unless rerolling
    /// is enabled, in which case the remaining candidates are tried.
    pub fn select(&self, request: &PageRequest) -> AppResult<Option<NotificationRecord>> {
        if request.is_admin {
            return Ok(None);
        }

        let mut candidates = self.eligible(request)?;
        while let Some(picked) = selector::pick_one(&candidates) {
            if !dismissal::is_dismissed(&picked, &request.cookies) {
                return Ok(Some(picked));
            }

            debug!("Picked notification '{}' was dismissed", picked.title);
            if !self.reroll_dismissed {
                return Ok(None);
            }
            candidates.retain(|candidate| *candidate != picked);
        }

        Ok(None)
    }

    /// Banner markup for this request, or `None`
    pub fn render_notification(&self, request: &PageRequest) -> Option<String> {
        let picked = match self.select(request) {
            Ok(picked) => picked?,
            Err(e) => {
                warn!("Skipping footer notification ({}): {}", e.category(), e);
                return None;
            }
        };

        match self.renderer.render(&picked) {
            Ok(html) => Some(html),
            Err(e) => {
                warn!("Failed to render footer notification: {}", e);
                None
            }
        }
    }

    /// Head and footer fragments including any injected tracking code
    ///
    /// Footer code with priority 5 precedes the banner; 15 follows it.
    pub fn render_page(&self, request: &PageRequest) -> PageFragments {
        if request.is_admin {
            return PageFragments::default();
        }

        let settings = self.repository.scripts_settings().unwrap_or_else(|e| {
            warn!("Ignoring tracking scripts settings: {}", e);
            Default::default()
        });

        let banner = self.render_notification(request).unwrap_or_default();
        let footer_code = scripts::inject_footer_code(&settings).unwrap_or_default();
        let footer = match settings.footer_code.priority {
            FooterPriority::BeforeNotifications => footer_code + &banner,
            FooterPriority::AfterNotifications => banner + &footer_code,
        };

        PageFragments {
            head: scripts::inject_header_code(&settings).unwrap_or_default(),
            footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::notifications::{PageType, ShowOn};
    use crate::storage::{MemoryOptionStore, OptionStore};
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn engine(records: &[NotificationRecord]) -> FooterBar {
        let repository = Arc::new(NotificationRepository::new(
            Arc::new(MemoryOptionStore::new()),
            &CacheConfig::default(),
        ));
        repository.replace_all(records).unwrap();
        FooterBar::new(repository, FooterRenderer::new().unwrap())
    }

    fn request(page_type: PageType, logged_in: bool) -> PageRequest {
        PageRequest::new(RequestContext::new(logged_in, page_type)).at(at("2026-03-10", "12:00:00"))
    }

    fn scenario() -> Vec<NotificationRecord> {
        vec![
            NotificationRecord::titled("A"),
            NotificationRecord { show_on: ShowOn::Homepage, ..NotificationRecord::titled("B") },
            NotificationRecord { end_date: "2026-03-09".into(), ..NotificationRecord::titled("C") },
        ]
    }

    #[test]
    fn test_end_to_end_scenario() {
        let engine = engine(&scenario());

        for _ in 0..50 {
            let picked = engine.select(&request(PageType::Post, false)).unwrap().unwrap();
            assert_eq!(picked.title, "A");
        }

        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..200 {
            let picked = engine.select(&request(PageType::Home, false)).unwrap().unwrap();
            match picked.title.as_str() {
                "A" => seen_a = true,
                "B" => seen_b = true,
                other => panic!("unexpected pick {other}"),
            }
        }
        assert!(seen_a && seen_b);
    }

    #[test]
    fn test_no_eligible_means_no_banner() {
        let engine = engine(&[NotificationRecord { enabled: false, ..NotificationRecord::titled("A") }]);
        assert_eq!(engine.select(&request(PageType::Home, false)).unwrap(), None);
        assert_eq!(engine.render_notification(&request(PageType::Home, false)), None);
    }

    #[test]
    fn test_dismissed_pick_shows_nothing() {
        let only = NotificationRecord::titled("A");
        let engine = engine(std::slice::from_ref(&only));
        let mut cookies = CookieJar::new();
        cookies.insert(dismissal::cookie_name(&only), "1");

        let request = request(PageType::Home, false).with_cookies(cookies);
        assert_eq!(engine.select(&request).unwrap(), None);
    }

    #[test]
    fn test_reroll_skips_dismissed() {
        let a = NotificationRecord::titled("A");
        let b = NotificationRecord::titled("B");
        let engine = engine(&[a.clone(), b]).with_reroll_dismissed(true);
        let mut cookies = CookieJar::new();
        cookies.insert(dismissal::cookie_name(&a), "1");
        let request = request(PageType::Home, false).with_cookies(cookies);

        for _ in 0..50 {
            assert_eq!(engine.select(&request).unwrap().unwrap().title, "B");
        }
    }

    #[test]
    fn test_admin_requests_get_nothing() {
        let engine = engine(&scenario());
        let mut request = request(PageType::Home, false);
        request.is_admin = true;

        assert_eq!(engine.select(&request).unwrap(), None);
        assert_eq!(engine.render_page(&request), PageFragments::default());
    }

    #[test]
    fn test_store_failure_degrades_to_no_banner() {
        let store: Arc<dyn OptionStore> = Arc::new(MemoryOptionStore::new());
        store.set("pfb_notifications", &json!({ "not": "a list" })).unwrap();
        let repository = Arc::new(NotificationRepository::new(store, &CacheConfig::default()));
        let engine = FooterBar::new(repository, FooterRenderer::new().unwrap());

        let request = request(PageType::Home, false);
        assert!(engine.select(&request).is_err());
        assert_eq!(engine.render_notification(&request), None);
        assert_eq!(engine.render_page(&request).footer, "");
    }

    #[test]
    fn test_hand_edited_colors_never_reach_the_page() {
        let store: Arc<dyn OptionStore> = Arc::new(MemoryOptionStore::new());
        store
            .set(
                "pfb_notifications",
                &json!([{ "title": "A", "bg_color": "", "text_color": "red;position:static" }]),
            )
            .unwrap();
        let repository = Arc::new(NotificationRepository::new(store, &CacheConfig::default()));
        let engine = FooterBar::new(repository, FooterRenderer::new().unwrap());

        let html = engine.render_notification(&request(PageType::Home, false)).unwrap();
        assert!(html.contains("background: #0f172a;"));
        assert!(html.contains("color: #ffffff;"));
        assert!(!html.contains("position:static"));
        assert!(!html.contains("background: ;"));
    }

    #[test]
    fn test_footer_code_ordering() {
        let engine = engine(&[NotificationRecord::titled("A")]);
        let mut settings = crate::notifications::ScriptsSettings::default();
        settings.footer_code.enabled = true;
        settings.footer_code.code = "<!-- pixel -->".into();
        settings.footer_code.priority = FooterPriority::BeforeNotifications;
        engine.repository().replace_scripts_settings(&settings).unwrap();

        let page = engine.render_page(&request(PageType::Home, false));
        let code_at = page.footer.find("<!-- pixel -->").unwrap();
        let banner_at = page.footer.find("pfb-sticky-footer").unwrap();
        assert!(code_at < banner_at);
        assert_eq!(page.head, "");

        settings.footer_code.priority = FooterPriority::AfterNotifications;
        engine.repository().replace_scripts_settings(&settings).unwrap();
        let page = engine.render_page(&request(PageType::Home, false));
        assert!(page.footer.find("<!-- pixel -->").unwrap() > page.footer.find("pfb-sticky-footer").unwrap());
    }

    #[test]
    fn test_schedule_boundaries_through_engine() {
        let tomorrow = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        let engine = engine(&[NotificationRecord {
            start_date: tomorrow.format("%Y-%m-%d").to_string(),
            ..NotificationRecord::titled("Later")
        }]);

        let today = request(PageType::Other, false);
        assert!(engine.eligible(&today).unwrap().is_empty());

        let next_day = today.clone().at(at("2026-03-11", "00:00:00"));
        assert_eq!(engine.eligible(&next_day).unwrap().len(), 1);
    }
}
