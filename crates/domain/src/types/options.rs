//! Options passed to the OAuth client
//!
//! Field names serialize to the shapes the browser SPA SDKs expect
//! (`authorizationParams`, `logoutParams`, `returnTo`, ...).

use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Where the OAuth client caches tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheLocation {
    /// Per-page memory; lost on reload and invisible to other tabs
    Memory,
    /// Origin-wide persistent storage; survives reloads and is shared by tabs
    LocalStorage,
}

/// Construction parameters for the OAuth client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    pub domain: String,
    pub client_id: String,
    pub cache_location: CacheLocation,
    /// Renew tokens through the refresh-token grant instead of a hidden
    /// iframe against the provider session
    pub use_refresh_tokens: bool,
    /// Send token requests form-encoded instead of JSON
    pub use_form_data: bool,
}

impl ClientOptions {
    /// Options for a persistent, refresh-token based session.
    #[must_use]
    pub fn persistent(config: &AuthConfig) -> Self {
        Self {
            domain: config.domain.clone(),
            client_id: config.client_id.clone(),
            cache_location: CacheLocation::LocalStorage,
            use_refresh_tokens: true,
            use_form_data: false,
        }
    }
}

/// Authorization request parameters sent with a redirect login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationParams {
    pub redirect_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    pub scope: String,
}

/// Options for `loginWithRedirect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOptions {
    pub authorization_params: AuthorizationParams,
}

impl LoginOptions {
    /// Login options that return the user to `origin`.
    #[must_use]
    pub fn for_origin(config: &AuthConfig, origin: impl Into<String>) -> Self {
        Self {
            authorization_params: AuthorizationParams {
                redirect_uri: origin.into(),
                audience: config.audience.clone(),
                scope: config.scope.clone(),
            },
        }
    }
}

/// Logout redirect parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutParams {
    pub return_to: String,
}

/// Options for `logout`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutOptions {
    pub logout_params: LogoutParams,
}

impl LogoutOptions {
    /// Logout options that return the user to `origin`.
    #[must_use]
    pub fn for_origin(origin: impl Into<String>) -> Self {
        Self { logout_params: LogoutParams { return_to: origin.into() } }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for types::options.
    use serde_json::json;

    use super::*;

    fn config(audience: Option<&str>) -> AuthConfig {
        AuthConfig {
            domain: "dev-test.us.auth0.com".to_string(),
            client_id: "client123".to_string(),
            audience: audience.map(str::to_string),
            scope: "openid profile name email".to_string(),
        }
    }

    /// Validates `ClientOptions::persistent` for the refresh token scenario.
    ///
    /// Assertions:
    /// - Confirms the cache is local storage.
    /// - Ensures refresh tokens are on and form data is off.
    #[test]
    fn test_persistent_client_options() {
        let options = ClientOptions::persistent(&config(None));
        assert_eq!(options.cache_location, CacheLocation::LocalStorage);
        assert!(options.use_refresh_tokens);
        assert!(!options.use_form_data);

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["cacheLocation"], "localstorage");
        assert_eq!(value["clientId"], "client123");
    }

    /// Validates the login options wire shape.
    ///
    /// Assertions:
    /// - Confirms parameters nest under `authorizationParams`.
    /// - Ensures an absent audience is omitted.
    #[test]
    fn test_login_options_shape() {
        let with_audience =
            LoginOptions::for_origin(&config(Some("https://api")), "https://app.example");
        assert_eq!(
            serde_json::to_value(&with_audience).unwrap(),
            json!({
                "authorizationParams": {
                    "redirect_uri": "https://app.example",
                    "audience": "https://api",
                    "scope": "openid profile name email"
                }
            })
        );

        let without = LoginOptions::for_origin(&config(None), "https://app.example");
        let value = serde_json::to_value(&without).unwrap();
        assert!(value["authorizationParams"].get("audience").is_none());
    }

    /// Validates the logout options wire shape.
    #[test]
    fn test_logout_options_shape() {
        let options = LogoutOptions::for_origin("https://app.example");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "logoutParams": { "returnTo": "https://app.example" } })
        );
    }
}
