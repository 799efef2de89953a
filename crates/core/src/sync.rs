//! Cross-tab storage synchronization
//!
//! Every same-origin tab except the writer is notified when persistent
//! storage changes. The listener turns each notification into a call back
//! into the session; a lagged receiver collapses the missed notifications
//! into a single call.

use std::future::Future;

use authsync_domain::StorageEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::debug;

/// Background task forwarding storage notifications; aborted on drop
#[derive(Debug)]
pub struct StorageListener {
    handle: JoinHandle<()>,
}

impl StorageListener {
    /// Spawn the listener.
    ///
    /// `on_change` returns `None` once its target is gone, which ends the
    /// task; so does the notification source closing.
    pub fn spawn<F, Fut>(mut events: broadcast::Receiver<StorageEvent>, mut on_change: F) -> Self
    where
        F: FnMut() -> Option<Fut> + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => debug!(key = ?event.key, "storage change observed"),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "storage notifications coalesced");
                    }
                    Err(RecvError::Closed) => {
                        debug!("storage notification source closed");
                        break;
                    }
                }

                match on_change() {
                    Some(refresh) => refresh.await,
                    None => break,
                }
            }
        });

        Self { handle }
    }

    /// `true` once the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for StorageListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
