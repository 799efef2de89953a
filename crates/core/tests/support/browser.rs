//! Browser, environment and runtime fakes

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use authsync_core::ports::{BrowserContext, EnvironmentAccessor, RuntimeContextGuard};
use authsync_domain::{AuthError, Result as DomainResult, StorageEvent};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use url::Url;

/// Single tab with an in-memory location and a hand-fired storage channel.
pub struct FakeBrowser {
    url: Mutex<Url>,
    replaced: Mutex<Vec<String>>,
    replace_error: Mutex<Option<AuthError>>,
    url_reads: AtomicUsize,
    storage: broadcast::Sender<StorageEvent>,
}

impl FakeBrowser {
    pub fn new(url: &str) -> Self {
        let (storage, _) = broadcast::channel(16);
        Self {
            url: Mutex::new(Url::parse(url).expect("test URL must parse")),
            replaced: Mutex::new(Vec::new()),
            replace_error: Mutex::new(None),
            url_reads: AtomicUsize::new(0),
            storage,
        }
    }

    /// Make every history replace fail with `err`.
    pub fn fail_replace(&self, err: AuthError) {
        *self.replace_error.lock() = Some(err);
    }

    /// Simulate another tab writing to shared storage.
    pub fn notify_storage_change(&self, key: &str) {
        let _ = self.storage.send(StorageEvent::for_key(key));
    }

    pub fn url(&self) -> String {
        self.url.lock().to_string()
    }

    pub fn replaced_paths(&self) -> Vec<String> {
        self.replaced.lock().clone()
    }

    pub fn url_reads(&self) -> usize {
        self.url_reads.load(Ordering::SeqCst)
    }

    pub fn storage_subscribers(&self) -> usize {
        self.storage.receiver_count()
    }
}

impl BrowserContext for FakeBrowser {
    fn current_url(&self) -> Url {
        self.url_reads.fetch_add(1, Ordering::SeqCst);
        self.url.lock().clone()
    }

    fn replace_url(&self, path: &str) -> DomainResult<()> {
        if let Some(err) = self.replace_error.lock().clone() {
            return Err(err);
        }

        let mut url = self.url.lock();
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
        self.replaced.lock().push(path.to_string());
        Ok(())
    }

    fn subscribe_storage_changes(&self) -> broadcast::Receiver<StorageEvent> {
        self.storage.subscribe()
    }
}

/// Configuration held in a map; editable between calls.
#[derive(Default)]
pub struct MapEnvironment {
    values: RwLock<HashMap<String, String>>,
}

impl MapEnvironment {
    /// Domain and client id set, audience and scope unset.
    pub fn auth0() -> Self {
        Self::default().with("auth0Domain", "dev-test.us.auth0.com").with("auth0ClientId", "client123")
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

impl EnvironmentAccessor for MapEnvironment {
    fn get_env_var(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

/// Runtime guard with a fixed answer.
pub struct FixedRuntimeGuard(bool);

impl FixedRuntimeGuard {
    pub const fn browser() -> Self {
        Self(false)
    }

    pub const fn server() -> Self {
        Self(true)
    }
}

impl RuntimeContextGuard for FixedRuntimeGuard {
    fn is_server_render(&self) -> bool {
        self.0
    }
}
