//! Runtime context guards

use authsync_core::ports::RuntimeContextGuard;

/// Environment variable forcing server-render mode (`1` or `true`).
pub const SERVER_RENDER_ENV_VAR: &str = "AUTHSYNC_SERVER_RENDER";

/// Guard with a fixed answer decided at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRuntimeGuard {
    server_render: bool,
}

impl StaticRuntimeGuard {
    #[must_use]
    pub const fn browser() -> Self {
        Self { server_render: false }
    }

    #[must_use]
    pub const fn server() -> Self {
        Self { server_render: true }
    }

    /// Server mode when `AUTHSYNC_SERVER_RENDER` is `1` or `true`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_flag(std::env::var(SERVER_RENDER_ENV_VAR).ok().as_deref())
    }

    fn from_flag(flag: Option<&str>) -> Self {
        let server_render = flag
            .map(str::trim)
            .is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true"));
        Self { server_render }
    }
}

impl RuntimeContextGuard for StaticRuntimeGuard {
    fn is_server_render(&self) -> bool {
        self.server_render
    }
}
