//! Configuration sources
//!
//! Every source implements [`EnvironmentAccessor`] and answers lookups for
//! the camelCase configuration keys (`auth0Domain`, `auth0ClientId`,
//! `auth0Audience`, `auth0Scope`).
//!
//! ## Process environment
//! Keys map to upper snake case, optionally prefixed:
//! - `auth0Domain` → `AUTH0_DOMAIN`
//! - `auth0ClientId` → `AUTH0_CLIENT_ID`
//! - with prefix `APP`: `auth0Scope` → `APP_AUTH0_SCOPE`
//!
//! ## File Locations
//! [`probe_config_paths`] checks, in order:
//! 1. `./authsync.toml`, `./authsync.json` (current working directory)
//! 2. `../authsync.toml`, `../authsync.json`
//! 3. `../../authsync.toml`, `../../authsync.json`

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use authsync_core::ports::EnvironmentAccessor;
use authsync_domain::{AuthError, Result};
use tracing::{debug, info};

const CONFIG_FILE_STEM: &str = "authsync";

/// Reads configuration from process environment variables
#[derive(Debug, Clone, Default)]
pub struct ProcessEnvironment {
    prefix: Option<String>,
}

impl ProcessEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look keys up as `{PREFIX}_{KEY}`.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }

    /// Load a `.env` file from the working directory (or a parent) into the
    /// process environment first. Variables already set are not overridden.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!(path = %path.display(), "loaded .env file"),
            Err(err) => debug!(error = %err, "no .env file loaded"),
        }
        self
    }

    /// Environment variable name consulted for `key`.
    #[must_use]
    pub fn variable_name(&self, key: &str) -> String {
        let name = to_upper_snake(key);
        match &self.prefix {
            Some(prefix) => format!("{prefix}_{name}"),
            None => name,
        }
    }
}

impl EnvironmentAccessor for ProcessEnvironment {
    fn get_env_var(&self, key: &str) -> Option<String> {
        std::env::var(self.variable_name(key)).ok()
    }
}

fn to_upper_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}

/// Flat key/value configuration loaded from a TOML or JSON file
///
/// ```toml
/// auth0Domain = "dev-abc123.us.auth0.com"
/// auth0ClientId = "client123"
/// ```
#[derive(Debug, Clone)]
pub struct FileEnvironment {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileEnvironment {
    /// Load `path`; the format is chosen by its extension.
    ///
    /// # Errors
    /// Returns `AuthError::Config` if the file is missing, unreadable, not
    /// a flat table of strings, or has an unsupported extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AuthError::Config(format!("Config file not found: {}", path.display())));
        }

        info!(path = %path.display(), "loading configuration from file");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AuthError::Config(format!("Failed to read config file: {e}")))?;

        let values = parse_values(&contents, path)?;
        Ok(Self { path: path.to_path_buf(), values })
    }

    /// Load the first file found by [`probe_config_paths`].
    ///
    /// # Errors
    /// Returns `AuthError::Config` when no file is found or it fails to load.
    pub fn discover() -> Result<Self> {
        let path = probe_config_paths().ok_or_else(|| {
            AuthError::Config("No config file found in any of the standard locations".to_string())
        })?;
        Self::load(path)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl EnvironmentAccessor for FileEnvironment {
    fn get_env_var(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn parse_values(contents: &str, path: &Path) -> Result<HashMap<String, String>> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AuthError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AuthError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AuthError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for an `authsync.{toml,json}` file
///
/// Returns the first existing candidate, or `None`.
#[must_use]
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_from(&cwd)
}

fn probe_from(base: &Path) -> Option<PathBuf> {
    let candidates = ["", "..", "../.."].into_iter().flat_map(|dir| {
        let dir = base.join(dir);
        ["toml", "json"].map(move |ext| dir.join(format!("{CONFIG_FILE_STEM}.{ext}")))
    });

    for candidate in candidates {
        if candidate.exists() {
            debug!(path = %candidate.display(), "found config file");
            return Some(candidate);
        }
    }

    None
}

/// In-memory configuration
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    values: HashMap<String, String>,
}

impl MapEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl EnvironmentAccessor for MapEnvironment {
    fn get_env_var(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Ordered chain of sources; the first source with a value wins
#[derive(Clone, Default)]
pub struct LayeredEnvironment {
    sources: Vec<Arc<dyn EnvironmentAccessor>>,
}

impl LayeredEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower priority source.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn EnvironmentAccessor>) -> Self {
        self.sources.push(source);
        self
    }

    /// Process environment (after loading `.env`), then a discovered config
    /// file if one exists.
    ///
    /// # Errors
    /// Returns `AuthError::Config` if a discovered file fails to load.
    pub fn standard() -> Result<Self> {
        let mut layered = Self::new().with_source(Arc::new(ProcessEnvironment::new().with_dotenv()));
        if let Some(path) = probe_config_paths() {
            layered = layered.with_source(Arc::new(FileEnvironment::load(path)?));
        }
        Ok(layered)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl EnvironmentAccessor for LayeredEnvironment {
    fn get_env_var(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get_env_var(key))
    }
}
