//! User profile types
//!
//! Profile payload returned by the OAuth client's `getUser()`; the standard
//! OIDC claims are typed and everything else is preserved as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OIDC user profile as reported by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Subject identifier (e.g. "auth0|64f1...")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Provider specific claims not modelled above
    #[serde(flatten)]
    pub claims: BTreeMap<String, Value>,
}

impl UserProfile {
    /// Profile carrying only a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    /// Look up an arbitrary claim, typed fields included.
    #[must_use]
    pub fn claim(&self, key: &str) -> Option<Value> {
        match key {
            "sub" => self.sub.clone().map(Value::String),
            "name" => self.name.clone().map(Value::String),
            "nickname" => self.nickname.clone().map(Value::String),
            "email" => self.email.clone().map(Value::String),
            "email_verified" => self.email_verified.map(Value::Bool),
            "picture" => self.picture.clone().map(Value::String),
            other => self.claims.get(other).cloned(),
        }
    }
}
