//! Shared test helpers for `authsync-core` integration tests.
//!
//! Fakes for every port so session tests can focus on behaviour instead of
//! boilerplate.

#![allow(dead_code)]

pub mod browser;
pub mod oauth;

use std::sync::Arc;

use authsync_core::SessionStateManager;
use authsync_domain::SessionPolicy;

pub use browser::{FakeBrowser, FixedRuntimeGuard, MapEnvironment};
pub use oauth::{MockClientFactory, MockOAuthClient};

/// A manager wired to fakes that tests can poke at.
pub struct Harness {
    pub manager: Arc<SessionStateManager>,
    pub client: Arc<MockOAuthClient>,
    pub factory: Arc<MockClientFactory>,
    pub browser: Arc<FakeBrowser>,
    pub environment: Arc<MapEnvironment>,
}

impl Harness {
    /// Browser harness at `url` with a complete configuration.
    pub fn at(url: &str) -> Self {
        Self::build(url, MapEnvironment::auth0(), FixedRuntimeGuard::browser(), None)
    }

    pub fn with_policy(url: &str, policy: SessionPolicy) -> Self {
        Self::build(url, MapEnvironment::auth0(), FixedRuntimeGuard::browser(), Some(policy))
    }

    pub fn with_environment(url: &str, environment: MapEnvironment) -> Self {
        Self::build(url, environment, FixedRuntimeGuard::browser(), None)
    }

    pub fn server_render(url: &str) -> Self {
        Self::build(url, MapEnvironment::auth0(), FixedRuntimeGuard::server(), None)
    }

    fn build(
        url: &str,
        environment: MapEnvironment,
        runtime: FixedRuntimeGuard,
        policy: Option<SessionPolicy>,
    ) -> Self {
        let client = Arc::new(MockOAuthClient::new());
        let factory = Arc::new(MockClientFactory::new(client.clone()));
        let browser = Arc::new(FakeBrowser::new(url));
        let environment = Arc::new(environment);

        let mut manager = SessionStateManager::new(
            environment.clone(),
            browser.clone(),
            Arc::new(runtime),
            factory.clone(),
        );
        if let Some(policy) = policy {
            manager = manager.with_policy(policy);
        }

        Self { manager: Arc::new(manager), client, factory, browser, environment }
    }
}
