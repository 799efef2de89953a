//! Configuration loading and management
//!
//! Environment sources that resolve the `auth0*` configuration keys from the
//! process environment, `.env` files and config files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    probe_config_paths, FileEnvironment, LayeredEnvironment, MapEnvironment, ProcessEnvironment,
};
