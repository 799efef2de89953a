//! In-memory browser tabs over shared origin storage
//!
//! Mirrors the browser's storage event contract: a write that changes
//! storage notifies every other tab of the origin, never the writing tab
//! itself, and a write that changes nothing notifies nobody.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use authsync_core::ports::BrowserContext;
use authsync_domain::{AuthError, Result, StorageEvent};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, trace};
use url::Url;
use uuid::Uuid;

const TAB_EVENT_CAPACITY: usize = 64;

/// Identifier of an open tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(Uuid);

impl TabId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0.simple())
    }
}

#[derive(Default)]
struct StorageInner {
    items: BTreeMap<String, String>,
    tabs: Vec<(TabId, broadcast::Sender<StorageEvent>)>,
}

/// Persistent key/value storage shared by every tab of one origin
pub struct SharedStorage {
    origin: String,
    inner: Mutex<StorageInner>,
}

impl SharedStorage {
    /// Storage for the origin of `url` (scheme, host and port).
    ///
    /// # Errors
    /// Returns `AuthError::Browser` if `url` does not parse or has an opaque
    /// origin.
    pub fn for_origin(url: &str) -> Result<Arc<Self>> {
        let url = parse_url(url)?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(AuthError::Browser(format!("opaque origin for {url}")));
        }

        Ok(Arc::new(Self {
            origin: origin.ascii_serialization(),
            inner: Mutex::new(StorageInner::default()),
        }))
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.inner.lock().items.get(key).cloned()
    }

    /// Store `value` under `key` on behalf of `writer`.
    pub fn set_item(&self, writer: TabId, key: &str, value: &str) {
        let mut inner = self.inner.lock();
        let previous = inner.items.insert(key.to_string(), value.to_string());
        if previous.as_deref() != Some(value) {
            notify_others(&inner.tabs, writer, StorageEvent::for_key(key));
        }
    }

    pub fn remove_item(&self, writer: TabId, key: &str) {
        let mut inner = self.inner.lock();
        if inner.items.remove(key).is_some() {
            notify_others(&inner.tabs, writer, StorageEvent::for_key(key));
        }
    }

    pub fn clear(&self, writer: TabId) {
        let mut inner = self.inner.lock();
        if !inner.items.is_empty() {
            inner.items.clear();
            notify_others(&inner.tabs, writer, StorageEvent::cleared());
        }
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().items.keys().cloned().collect()
    }

    /// Number of open tabs.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.inner.lock().tabs.len()
    }

    fn register(&self) -> (TabId, broadcast::Sender<StorageEvent>) {
        let id = TabId::new();
        let (sender, _) = broadcast::channel(TAB_EVENT_CAPACITY);
        self.inner.lock().tabs.push((id, sender.clone()));
        debug!(tab = %id, origin = %self.origin, "tab opened");
        (id, sender)
    }

    fn unregister(&self, id: TabId) {
        self.inner.lock().tabs.retain(|(tab, _)| *tab != id);
        debug!(tab = %id, origin = %self.origin, "tab closed");
    }
}

fn notify_others(
    tabs: &[(TabId, broadcast::Sender<StorageEvent>)],
    writer: TabId,
    event: StorageEvent,
) {
    for (tab, sender) in tabs.iter().filter(|(tab, _)| *tab != writer) {
        // No receivers just means the tab is not listening yet.
        let delivered = sender.send(event.clone()).is_ok();
        trace!(tab = %tab, key = ?event.key, delivered, "storage event dispatched");
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| AuthError::Browser(format!("invalid URL '{url}': {e}")))
}

/// One page of an origin, backed by [`SharedStorage`]
///
/// Closing (dropping) the tab stops its storage notifications.
pub struct InMemoryTab {
    id: TabId,
    storage: Arc<SharedStorage>,
    location: Mutex<Url>,
    replacements: Mutex<Vec<String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl InMemoryTab {
    /// Open a tab at `url`, which must belong to the storage's origin.
    ///
    /// # Errors
    /// Returns `AuthError::Browser` for an unparsable or cross-origin URL.
    pub fn open(storage: &Arc<SharedStorage>, url: &str) -> Result<Self> {
        let location = parse_url(url)?;
        let origin = location.origin().ascii_serialization();
        if origin != storage.origin() {
            return Err(AuthError::Browser(format!(
                "{origin} cannot open a tab on storage for {}",
                storage.origin()
            )));
        }

        let (id, events) = storage.register();
        Ok(Self {
            id,
            storage: Arc::clone(storage),
            location: Mutex::new(location),
            replacements: Mutex::new(Vec::new()),
            events,
        })
    }

    #[must_use]
    pub const fn id(&self) -> TabId {
        self.id
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<SharedStorage> {
        &self.storage
    }

    /// Navigate to `url` (a full page load in a real browser).
    ///
    /// # Errors
    /// Returns `AuthError::Browser` if `url` does not parse.
    pub fn navigate(&self, url: &str) -> Result<()> {
        let next = parse_url(url)?;
        debug!(tab = %self.id, url = %next, "navigating");
        *self.location.lock() = next;
        Ok(())
    }

    /// Paths passed to [`BrowserContext::replace_url`], oldest first.
    #[must_use]
    pub fn replacements(&self) -> Vec<String> {
        self.replacements.lock().clone()
    }

    pub fn set_item(&self, key: &str, value: &str) {
        self.storage.set_item(self.id, key, value);
    }

    pub fn remove_item(&self, key: &str) {
        self.storage.remove_item(self.id, key);
    }

    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key)
    }
}

impl BrowserContext for InMemoryTab {
    fn current_url(&self) -> Url {
        self.location.lock().clone()
    }

    fn replace_url(&self, path: &str) -> Result<()> {
        let mut location = self.location.lock();
        let replaced = location
            .join(path)
            .map_err(|e| AuthError::Browser(format!("cannot replace URL with '{path}': {e}")))?;
        if replaced.origin() != location.origin() {
            return Err(AuthError::Browser(format!("'{path}' leaves the current origin")));
        }

        *location = replaced;
        self.replacements.lock().push(path.to_string());
        Ok(())
    }

    fn subscribe_storage_changes(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}

impl Drop for InMemoryTab {
    fn drop(&mut self) {
        self.storage.unregister(self.id);
    }
}
