//! Diagnostic records
//!
//! Failures inside the session manager are never raised to its callers.
//! They are logged and kept as `Diagnostic` entries so hosts can surface them.

use authsync_common::{ErrorClassification, ErrorSeverity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// A contained failure observed by the session manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub at: DateTime<Utc>,
    pub severity: ErrorSeverity,
    /// Whether repeating the operation may succeed
    pub retryable: bool,
    /// Session operation that observed the failure (e.g. "initialize")
    pub operation: String,
    pub error: AuthError,
}

impl Diagnostic {
    /// Record `error` as observed now by `operation`.
    pub fn new(operation: impl Into<String>, error: AuthError) -> Self {
        Self {
            at: Utc::now(),
            severity: error.severity(),
            retryable: error.is_retryable(),
            operation: operation.into(),
            error,
        }
    }

    /// Human readable one-liner, e.g. `[ERROR] initialize: Redirect callback failed: ...`.
    #[must_use]
    pub fn message(&self) -> String {
        format!("[{}] {}: {}", self.severity, self.operation, self.error)
    }
}
