//! Port interfaces for the session core
//!
//! These traits define the boundaries between the session state machine and
//! the things it cannot own: the hosting page, the configuration source, and
//! the OAuth/PKCE client library.

use std::sync::Arc;

use async_trait::async_trait;
use authsync_domain::{
    ClientOptions, LoginOptions, LogoutOptions, Result, StorageEvent, UserProfile,
};
use tokio::sync::broadcast;
use url::Url;

/// Resolves named configuration values (`auth0Domain`, `auth0ClientId`, ...)
pub trait EnvironmentAccessor: Send + Sync {
    /// Value for `key`, or `None` when it is not configured.
    fn get_env_var(&self, key: &str) -> Option<String>;
}

/// Reports whether code is running outside a browser (server rendering)
pub trait RuntimeContextGuard: Send + Sync {
    /// `true` when browser-only operations must be skipped.
    fn is_server_render(&self) -> bool;
}

/// The page the session lives in: its URL, history and shared storage
pub trait BrowserContext: Send + Sync {
    /// Full URL of the current page, query string included.
    fn current_url(&self) -> Url;

    /// Scheme, host and port of the current page (e.g. `https://app.example`).
    fn origin(&self) -> String {
        self.current_url().origin().ascii_serialization()
    }

    /// Replace the current history entry with `path` without navigating.
    ///
    /// # Errors
    /// Returns `AuthError::Browser` if the history API rejects the change.
    fn replace_url(&self, path: &str) -> Result<()>;

    /// Subscribe to storage changes made by *other* same-origin tabs.
    fn subscribe_storage_changes(&self) -> broadcast::Receiver<StorageEvent>;
}

/// Calling contract for the OAuth/PKCE client library
///
/// Implementations own token exchange, PKCE, token caching and silent
/// renewal; the session core only sequences these calls.
#[async_trait]
pub trait OAuthClientAdapter: Send + Sync {
    /// Exchange the authorization code carried by `url` for tokens.
    async fn handle_redirect_callback(&self, url: &Url) -> Result<()>;

    /// Whether a usable session exists (may consult cached tokens).
    async fn is_authenticated(&self) -> Result<bool>;

    /// Profile of the signed in user, `None` when signed out.
    async fn get_user(&self) -> Result<Option<UserProfile>>;

    /// A valid access token, renewing it silently if needed.
    async fn get_token_silently(&self) -> Result<String>;

    /// Navigate to the provider's login page.
    ///
    /// On success the page is replaced and this call effectively never
    /// returns to the caller's normal flow.
    async fn login_with_redirect(&self, options: &LoginOptions) -> Result<()>;

    /// Clear the local session and navigate to the provider's logout page.
    async fn logout(&self, options: &LogoutOptions) -> Result<()>;
}

/// Constructs the OAuth client once configuration is known
#[async_trait]
pub trait OAuthClientFactory: Send + Sync {
    /// Build and configure a client.
    async fn create_client(&self, options: &ClientOptions) -> Result<Arc<dyn OAuthClientAdapter>>;
}
