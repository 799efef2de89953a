//! # authsync Core
//!
//! Browser session logic - no platform dependencies.
//!
//! This crate contains:
//! - Port interfaces for the browser, configuration and the OAuth client
//! - Redirect callback detection
//! - The per-tab session state manager
//! - Cross-tab storage listener
//!
//! ## Architecture Principles
//! - Only depends on `authsync-domain` and `authsync-common`
//! - No DOM, network or storage code
//! - All external effects go through traits

pub mod callback;
pub mod ports;
pub mod session;
pub mod sync;

pub use callback::RedirectOutcome;
pub use ports::{
    BrowserContext, EnvironmentAccessor, OAuthClientAdapter, OAuthClientFactory,
    RuntimeContextGuard,
};
pub use session::{DiagnosticLog, SessionStateManager};
pub use sync::StorageListener;
