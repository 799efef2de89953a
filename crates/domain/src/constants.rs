//! Application constants
//!
//! Configuration keys understood by the environment accessor and the
//! defaults applied when optional values are absent.

// Configuration keys
pub const KEY_DOMAIN: &str = "auth0Domain";
pub const KEY_CLIENT_ID: &str = "auth0ClientId";
pub const KEY_AUDIENCE: &str = "auth0Audience";
pub const KEY_SCOPE: &str = "auth0Scope";

/// Every key the session manager may look up, in resolution order.
pub const CONFIG_KEYS: [&str; 4] = [KEY_DOMAIN, KEY_CLIENT_ID, KEY_AUDIENCE, KEY_SCOPE];

// Defaults
pub const DEFAULT_SCOPE: &str = "openid profile name email";
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 32;

// Redirect query parameters
pub const PARAM_CODE: &str = "code";
pub const PARAM_STATE: &str = "state";
pub const PARAM_ERROR: &str = "error";
pub const PARAM_ERROR_DESCRIPTION: &str = "error_description";

/// Path the browser URL is rewritten to once a redirect callback is handled.
pub const CALLBACK_CLEAN_PATH: &str = "/";
