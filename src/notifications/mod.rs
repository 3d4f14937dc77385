//! Notification selection and eligibility engine
//!
//! Record types, save-time sanitization, the eligibility filter, the random
//! selector, the dismissal gate and the preset catalog.

pub mod types;
pub mod sanitizer;
pub mod eligibility;
pub mod selector;
pub mod dismissal;
pub mod presets;

pub use types::{NotificationRecord, PageType, Position, RequestContext, ScriptsSettings, ShowOn};
pub use dismissal::CookieJar;
pub use sanitizer::{DefaultNotificationSanitizer, NotificationSanitizer, RawNotification};
