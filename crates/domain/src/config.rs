//! Configuration management
//!
//! Values arrive as opaque strings from whatever environment the host
//! provides; this module only validates and normalizes them.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DIAGNOSTICS_CAPACITY, DEFAULT_SCOPE};
use crate::constants::{KEY_AUDIENCE, KEY_CLIENT_ID, KEY_DOMAIN, KEY_SCOPE};
use crate::errors::{AuthError, Result};

/// Identity provider settings resolved at initialization time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Authorization server domain (e.g. "dev-abc123.us.auth0.com")
    pub domain: String,

    /// OAuth client ID
    pub client_id: String,

    /// API identifier requested at login; omitted when not configured
    pub audience: Option<String>,

    /// Space separated scopes requested at login
    pub scope: String,
}

impl AuthConfig {
    /// Resolve configuration through a key lookup.
    ///
    /// `auth0Domain` and `auth0ClientId` are required. A blank `auth0Scope`
    /// falls back to [`DEFAULT_SCOPE`] and a blank `auth0Audience` counts as
    /// absent.
    ///
    /// # Errors
    /// Returns `AuthError::Config` naming the first missing required key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
        };

        let domain = non_blank(KEY_DOMAIN)
            .ok_or_else(|| AuthError::Config(format!("missing required key '{KEY_DOMAIN}'")))?;
        let client_id = non_blank(KEY_CLIENT_ID)
            .ok_or_else(|| AuthError::Config(format!("missing required key '{KEY_CLIENT_ID}'")))?;

        Ok(Self {
            domain,
            client_id,
            audience: non_blank(KEY_AUDIENCE),
            scope: non_blank(KEY_SCOPE).unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
        })
    }
}

/// Behavioural switches for the session manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPolicy {
    /// Wipe the cached profile and token whenever a refresh resolves to
    /// signed out.
    pub clear_on_signed_out: bool,

    /// Serialize overlapping state refreshes so each one observes the
    /// previous one's result.
    pub single_flight_refresh: bool,

    /// How many diagnostics to retain; the oldest are dropped first.
    pub diagnostics_capacity: usize,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            clear_on_signed_out: true,
            single_flight_refresh: true,
            diagnostics_capacity: DEFAULT_DIAGNOSTICS_CAPACITY,
        }
    }
}
