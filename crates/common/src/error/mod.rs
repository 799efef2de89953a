//! Error classification shared across authsync crates
//!
//! Module-specific error enums stay where they are defined (for example
//! `AuthError` in `authsync-domain`) and implement [`ErrorClassification`]
//! so callers can make uniform decisions about them:
//!
//! - **`is_retryable()`**: would repeating the operation plausibly succeed?
//! - **`severity()`**: how loudly should this be reported?
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | User cancelled a login at the provider |
//! | **Warning** | Degraded but operational | Silent token renewal failed |
//! | **Error** | Failure requiring attention | Callback exchange failed, bad config |
//! | **Critical** | Integrity at risk | Session invariants violated |
//!
//! ## Example
//!
//! ```rust
//! use authsync_common::error::{ErrorClassification, ErrorSeverity};
//!
//! #[derive(Debug)]
//! enum WidgetError {
//!     Missing,
//!     Timeout,
//! }
//!
//! impl ErrorClassification for WidgetError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Missing => ErrorSeverity::Info,
//!             Self::Timeout => ErrorSeverity::Warning,
//!         }
//!     }
//! }
//!
//! assert!(WidgetError::Timeout.is_retryable());
//! assert_eq!(WidgetError::Missing.severity(), ErrorSeverity::Info);
//! ```

use std::fmt;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: network hiccups, expired silent
    /// sessions that a fresh attempt can renew, and similar.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging decisions.
    fn severity(&self) -> ErrorSeverity;
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl ErrorSeverity {
    /// Short uppercase label used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
