//! Centralized error handling module
//!
//! Library code returns [`AppResult`]; the CLI boundary converts into
//! `anyhow::Error` for reporting.

pub mod types;
pub mod context;

pub use types::{AppError, AppResult};
pub use context::ErrorContextExt;

