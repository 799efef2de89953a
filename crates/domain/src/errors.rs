//! Error types used throughout authsync

use authsync_common::{ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for authsync
///
/// None of these are surfaced to callers of the session lifecycle operations;
/// the session manager records them as diagnostics and degrades to the
/// signed-out state instead.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AuthError {
    /// Required configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation needed the OAuth client before it was constructed, or
    /// while running outside a browser
    #[error("OAuth client unavailable: {0}")]
    ClientUnavailable(String),

    /// Processing the authorization redirect (code exchange) failed
    #[error("Redirect callback failed: {0}")]
    Callback(String),

    /// The identity provider redirected back with `error=...`
    #[error("Identity provider error: {}", describe_provider(.error, .description.as_deref()))]
    Provider { error: String, description: Option<String> },

    /// Silent token retrieval failed
    #[error("Token retrieval failed: {0}")]
    Token(String),

    /// Any other failure reported by the OAuth client
    #[error("OAuth client error during {operation}: {message}")]
    Client { operation: String, message: String },

    /// The browser context refused an operation (e.g. history replace)
    #[error("Browser error: {0}")]
    Browser(String),
}

fn describe_provider(error: &str, description: Option<&str>) -> String {
    match description {
        Some(desc) => format!("{error}: {desc}"),
        None => error.to_string(),
    }
}

impl AuthError {
    /// Build a [`AuthError::Client`] for the named adapter operation.
    pub fn client(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Client { operation: operation.into(), message: message.into() }
    }

    /// Build a [`AuthError::Provider`] from the redirect query values.
    pub fn provider(error: impl Into<String>, description: Option<String>) -> Self {
        Self::Provider { error: error.into(), description }
    }

    /// Stable label suitable for structured log fields.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::ClientUnavailable(_) => "client_unavailable",
            Self::Callback(_) => "callback",
            Self::Provider { .. } => "provider",
            Self::Token(_) => "token",
            Self::Client { .. } => "client",
            Self::Browser(_) => "browser",
        }
    }
}

impl ErrorClassification for AuthError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Token(_) | Self::Client { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            // The user backing out at the provider is an expected outcome.
            Self::Provider { error, .. } if error == "access_denied" => ErrorSeverity::Info,
            Self::ClientUnavailable(_) | Self::Token(_) => ErrorSeverity::Warning,
            Self::Config(_)
            | Self::Callback(_)
            | Self::Provider { .. }
            | Self::Client { .. }
            | Self::Browser(_) => ErrorSeverity::Error,
        }
    }
}

/// Result type alias for authsync operations
pub type Result<T> = std::result::Result<T, AuthError>;
