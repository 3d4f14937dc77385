//! Persistence for notifications and settings
//!
//! - `options`: the key/value option store
//! - `cache`: process and persistent cache tiers
//! - `repository`: typed access to the stored records

pub mod cache;
pub mod options;
pub mod repository;

pub use cache::{CacheTier, PersistentCache, ProcessCache, TieredCache};
pub use options::{FileOptionStore, MemoryOptionStore, OptionStore, OptionStoreExt};
pub use repository::NotificationRepository;
