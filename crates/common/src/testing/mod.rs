//! Testing utilities and helpers
//!
//! - **[`async_utils`]**: deadline-bound polling for effects produced on
//!   background tasks

pub mod async_utils;

pub use async_utils::{poll_until, timeout_ok};
