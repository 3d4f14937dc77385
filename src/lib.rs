//! Promotional Footer Bar Library
//!
//! This library picks at most one promotional notification per page view
//! and renders it as a sticky bar. It covers the stored notification
//! records, the eligibility rules, random selection, visitor dismissals,
//! caching of the enabled list, the authorized admin save path and
//! optional header/footer tracking code.

pub mod admin;
pub mod auth;
pub mod config;
pub mod errors;
pub mod footer;
pub mod notifications;
pub mod scripts;
pub mod shared;
pub mod storage;
pub mod templates;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigManager};
pub use footer::{FooterBar, PageFragments, PageRequest};
pub use notifications::{NotificationRecord, PageType, RequestContext};
pub use storage::NotificationRepository;
