//! # authsync Domain
//!
//! Domain types and models for browser-side OAuth sessions.
//!
//! This crate contains:
//! - Session state types (snapshot, phase, storage notifications)
//! - Domain error types and Result definitions
//! - Configuration and policy structures
//! - Options exchanged with the OAuth client
//!
//! ## Architecture
//! - Depends only on the foundation tier of `authsync-common`
//! - No I/O, no async runtime

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
