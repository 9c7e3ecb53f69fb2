//! Trailing-edge debouncing of resize notifications.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use parallax_common::ParallaxSettings;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::ScrollError;

type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Runs a callback once a burst of triggers has been quiet for `delay`.
///
/// Every [`trigger`](Self::trigger) restarts the timer. Dropping the
/// debouncer cancels a pending callback.
pub struct ResizeDebouncer {
    delay: Duration,
    callback: Callback,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for ResizeDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeDebouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl ResizeDebouncer {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Debouncer using the resize quiet period from `settings`.
    pub fn from_settings<F>(settings: &ParallaxSettings, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(settings.resize_debounce(), callback)
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restart the quiet-period timer.
    ///
    /// Must be called within a tokio runtime.
    pub fn trigger(&self) -> Result<(), ScrollError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ScrollError::NoRuntime)?;
        let mut pending = self.pending();

        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let delay = self.delay;
        let callback = Arc::clone(&self.callback);
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(?delay, "Resize settled");
            callback();
        }));

        Ok(())
    }

    /// Drop a pending callback, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending().take() {
            pending.abort();
            trace!("Resize callback cancelled");
        }
    }

    /// Whether a callback is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ResizeDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, ResizeDebouncer) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let debouncer = ResizeDebouncer::new(Duration::from_millis(150), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (count, debouncer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces() {
        let (count, debouncer) = counter();

        for _ in 0..5 {
            debouncer.trigger().unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (count, debouncer) = counter();

        debouncer.trigger().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.trigger().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop() {
        let (count, debouncer) = counter();

        debouncer.trigger().unwrap();
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        debouncer.trigger().unwrap();
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_trigger_requires_runtime() {
        let (_, debouncer) = counter();
        assert_eq!(debouncer.trigger(), Err(ScrollError::NoRuntime));
    }
}
