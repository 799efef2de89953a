//! Browser context implementations
//!
//! [`SharedStorage`] stands in for an origin's persistent storage and
//! [`InMemoryTab`] for one page of that origin. Native hosts and multi-tab
//! tests use them in place of a real browser.

mod memory;

pub use memory::{InMemoryTab, SharedStorage, TabId};
