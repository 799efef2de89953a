//! # authsync Infrastructure
//!
//! Infrastructure implementations of core session ports.
//!
//! This crate contains:
//! - Configuration sources (process environment, `.env`, TOML/JSON files)
//! - Logging setup on `tracing-subscriber`
//! - An in-memory browser with origin-wide shared storage
//! - Runtime context guards
//!
//! ## Architecture
//! - Implements traits defined in `authsync-core`
//! - Contains all "impure" code (process environment, files, globals)

pub mod browser;
pub mod config;
pub mod logging;
pub mod runtime;

// Re-export commonly used items
pub use browser::{InMemoryTab, SharedStorage, TabId};
pub use config::{FileEnvironment, LayeredEnvironment, MapEnvironment, ProcessEnvironment};
pub use logging::{LogConfig, LogFormat};
pub use runtime::StaticRuntimeGuard;
