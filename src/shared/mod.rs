//! Shared modules used by the library and the CLI binary
//!
//! Plain configuration types live here so that both the engine and the
//! configuration manager can depend on them without a cycle.

pub mod config;
