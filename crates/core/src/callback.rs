//! Redirect callback detection
//!
//! Classifies the query string the identity provider sends the browser back
//! with. The authorization branch (`code` + `state`) is checked first, so a
//! URL carrying both a code and an `error` is treated as a callback.

use authsync_domain::constants::{PARAM_CODE, PARAM_ERROR, PARAM_ERROR_DESCRIPTION, PARAM_STATE};
use url::{form_urlencoded, Url};

/// What the current URL says about a provider redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Authorization redirect return carrying a code to exchange
    Authorization { code: String, state: String },
    /// Provider redirected back with an error instead of a code
    ProviderError { error: String, description: Option<String> },
    /// Not a redirect return
    NoRedirect,
}

impl RedirectOutcome {
    /// Classify the query of `url`.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        url.query().map_or(Self::NoRedirect, Self::from_query)
    }

    /// Classify a raw query string, with or without the leading `?`.
    ///
    /// Values are form-decoded (`User+cancelled` becomes `User cancelled`).
    /// When a parameter repeats, its first occurrence wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut description = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                PARAM_CODE => &mut code,
                PARAM_STATE => &mut state,
                PARAM_ERROR => &mut error,
                PARAM_ERROR_DESCRIPTION => &mut description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        match (code, state, error) {
            (Some(code), Some(state), _) => Self::Authorization { code, state },
            (_, _, Some(error)) => Self::ProviderError { error, description },
            _ => Self::NoRedirect,
        }
    }

    /// `true` for an authorization redirect return.
    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for callback.
    use super::*;

    /// Validates the authorization redirect scenario.
    ///
    /// Assertions:
    /// - Confirms `code` and `state` are extracted.
    #[test]
    fn test_authorization_redirect() {
        let url = Url::parse("https://app.example/?code=abc&state=xyz").unwrap();
        assert_eq!(
            RedirectOutcome::from_url(&url),
            RedirectOutcome::Authorization { code: "abc".to_string(), state: "xyz".to_string() }
        );
    }

    /// Validates the provider error scenario.
    ///
    /// Assertions:
    /// - Confirms `error` is extracted.
    /// - Confirms `+` in the description decodes to a space.
    #[test]
    fn test_provider_error_redirect() {
        let outcome =
            RedirectOutcome::from_query("?error=access_denied&error_description=User+cancelled");
        assert_eq!(
            outcome,
            RedirectOutcome::ProviderError {
                error: "access_denied".to_string(),
                description: Some("User cancelled".to_string()),
            }
        );
    }

    /// Validates that code+state takes precedence over `error`.
    ///
    /// Assertions:
    /// - Ensures the outcome is `Authorization` even with `error` first.
    #[test]
    fn test_code_and_state_take_precedence() {
        let outcome = RedirectOutcome::from_query("error=login_required&code=c1&state=s1");
        assert!(outcome.is_authorization());
    }

    /// Validates incomplete callbacks.
    ///
    /// Assertions:
    /// - Ensures a lone `code` is not a callback.
    /// - Ensures a lone `code` with an `error` reports the error.
    /// - Ensures an empty query is not a callback.
    #[test]
    fn test_incomplete_callbacks() {
        assert_eq!(RedirectOutcome::from_query("code=abc"), RedirectOutcome::NoRedirect);
        assert!(matches!(
            RedirectOutcome::from_query("code=abc&error=server_error"),
            RedirectOutcome::ProviderError { ref error, description: None } if error == "server_error"
        ));
        assert_eq!(RedirectOutcome::from_query(""), RedirectOutcome::NoRedirect);

        let url = Url::parse("https://app.example/dashboard").unwrap();
        assert_eq!(RedirectOutcome::from_url(&url), RedirectOutcome::NoRedirect);
    }

    /// Validates that parameter names must match exactly.
    ///
    /// Assertions:
    /// - Ensures `postcode`/`statement` are not mistaken for `code`/`state`.
    /// - Confirms percent-encoded values are decoded.
    #[test]
    fn test_exact_parameter_names() {
        assert_eq!(
            RedirectOutcome::from_query("postcode=1&statement=2"),
            RedirectOutcome::NoRedirect
        );
        assert_eq!(
            RedirectOutcome::from_query("code=a%2Fb&state=s&code=ignored"),
            RedirectOutcome::Authorization { code: "a/b".to_string(), state: "s".to_string() }
        );
    }
}
