//! Async testing utilities
//!
//! Session refreshes triggered by storage notifications run on background
//! tasks, so tests observe their effects by polling with a deadline.

// Allow missing error/panic docs for test utilities
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::future::Future;
use std::time::Duration;

/// Assert that an async condition becomes true before a deadline
///
/// The condition expression is re-evaluated on every poll, so an `async`
/// block reading shared state sees each update. Polls every 10ms unless an
/// interval is given as a third argument.
///
/// # Examples
///
/// ```no_run
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::test(flavor = "multi_thread")]
/// async fn test_other_tab_signs_in() {
///     let signed_in = Arc::new(AtomicBool::new(false));
///     let listener = signed_in.clone();
///
///     // Stands in for a storage listener refreshing the session.
///     tokio::spawn(async move {
///         tokio::time::sleep(Duration::from_millis(100)).await;
///         listener.store(true, Ordering::SeqCst);
///     });
///
///     authsync_common::assert_eventually_async!(Duration::from_secs(1), async {
///         signed_in.load(Ordering::SeqCst)
///     });
/// }
/// ```
#[macro_export]
macro_rules! assert_eventually_async {
    ($timeout:expr, $fut:expr) => {
        $crate::assert_eventually_async!($timeout, $fut, std::time::Duration::from_millis(10))
    };
    ($timeout:expr, $fut:expr, $interval:expr) => {{
        let deadline = $timeout;
        let interval = $interval;
        let settled = tokio::time::timeout(deadline, async {
            while !$fut.await {
                tokio::time::sleep(interval).await;
            }
        })
        .await;

        assert!(settled.is_ok(), "condition still false after {:?}", deadline);
    }};
}

/// Wait for a future to complete with a timeout, returning a Result
///
/// Lets a test name the deadline once and `expect` the elapsed case with its
/// own message.
pub async fn timeout_ok<F, T>(duration: Duration, fut: F) -> Result<T, tokio::time::error::Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, fut).await
}

/// Poll an async condition until it returns true or times out
///
/// Returns `false` when the deadline passes first.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(interval).await;
    }

    condition().await
}
