//! Session state types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::UserProfile;

/// Position of a tab's session in the initialization/refresh state machine
///
/// ```text
/// Uninitialized ─initialize()─► CheckingCallback
/// CheckingCallback ─(nothing)──────► Refreshing
/// CheckingCallback ─(code+state)───► ProcessingCallback ─► UrlCleaned ─► Refreshing
/// CheckingCallback ─(error)────────► ErrorReported ─► Refreshing
/// Refreshing ─► Authenticated | Unauthenticated
/// any ─storage event / login / logout─► Refreshing
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    CheckingCallback,
    ProcessingCallback,
    UrlCleaned,
    ErrorReported,
    Refreshing,
    Authenticated,
    Unauthenticated,
}

impl SessionPhase {
    /// Whether moving from `self` to `next` is an edge of the state machine.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        use SessionPhase::{
            Authenticated, CheckingCallback, ErrorReported, ProcessingCallback, Refreshing,
            Uninitialized, UrlCleaned, Unauthenticated,
        };

        match (self, next) {
            // Re-entrant refresh from any phase (storage events, login, logout).
            (_, Refreshing) => true,
            (Uninitialized, CheckingCallback) => true,
            (CheckingCallback, ProcessingCallback | ErrorReported) => true,
            (ProcessingCallback, UrlCleaned) => true,
            (Refreshing, Authenticated | Unauthenticated) => true,
            _ => false,
        }
    }

    /// `true` once a refresh has resolved in either direction.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Authenticated | Self::Unauthenticated)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uninitialized => "uninitialized",
            Self::CheckingCallback => "checking_callback",
            Self::ProcessingCallback => "processing_callback",
            Self::UrlCleaned => "url_cleaned",
            Self::ErrorReported => "error_reported",
            Self::Refreshing => "refreshing",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        };
        f.write_str(label)
    }
}

/// Observable session record published to UI bindings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// `None` until the first authentication check completes
    pub is_authenticated: Option<bool>,
    pub current_user: Option<UserProfile>,
    /// Most recently retrieved access token
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub phase: SessionPhase,
}

impl SessionSnapshot {
    /// `true` only when the last check positively confirmed a session.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.is_authenticated == Some(true)
    }
}

/// Notification that origin-wide persistent storage changed in another tab
///
/// The session manager does not inspect the payload; any event triggers a
/// full refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    /// Changed key, `None` when storage was cleared
    pub key: Option<String>,
}

impl StorageEvent {
    /// Event for a single changed key.
    #[must_use]
    pub fn for_key(key: impl Into<String>) -> Self {
        Self { key: Some(key.into()) }
    }

    /// Event for a full storage clear.
    #[must_use]
    pub const fn cleared() -> Self {
        Self { key: None }
    }
}
