//! Logging setup using `tracing_subscriber`
//!
//! `RUST_LOG` directives take precedence over the configured default level.

use std::io::IsTerminal;
use std::str::FromStr;

use authsync_domain::{AuthError, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the output format (`compact` or `json`).
pub const LOG_FORMAT_ENV_VAR: &str = "AUTHSYNC_LOG_FORMAT";

/// Output format of the global subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(AuthError::Config(format!("Unknown log format: {other}"))),
        }
    }
}

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directive used when `RUST_LOG` is unset (e.g. `info`,
    /// `authsync_core=debug`)
    pub default_level: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            format: LogFormat::Compact,
            ansi: std::io::stderr().is_terminal(),
        }
    }
}

impl LogConfig {
    /// Defaults with the format taken from `AUTHSYNC_LOG_FORMAT`.
    ///
    /// # Errors
    /// Returns `AuthError::Config` for an unknown format name.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(format) = std::env::var(LOG_FORMAT_ENV_VAR) {
            config.format = format.parse()?;
        }
        Ok(config)
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.default_level))
            .map_err(|e| AuthError::Config(format!("Invalid log filter: {e}")))
    }
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `AuthError::Config` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| AuthError::Config(format!("Failed to install logger: {e}")))?;
    tracing::debug!(format = ?config.format, level = %config.default_level, "logging initialized");
    Ok(())
}
