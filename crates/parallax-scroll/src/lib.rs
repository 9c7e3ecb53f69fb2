//! # Parallax Scroll
//!
//! Scroll sampling shared by every parallax element on a page.
//!
//! [`ScrollBroadcaster`] polls a [`ScrollSource`] on a fixed interval and
//! broadcasts a [`ScrollEvent`] only when the position changed. One sampling
//! task serves all subscribers: it starts with the first subscription and is
//! aborted when the last one is dropped.
//!
//! [`ResizeDebouncer`] coalesces bursts of resize notifications into a single
//! callback after a quiet period.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use parallax_common::{ParallaxError, ParallaxSettings};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

pub mod debounce;

pub use debounce::ResizeDebouncer;

/// Capacity of the event channel. Slow subscribers skip to newer positions.
const CHANNEL_CAPACITY: usize = 16;

/// Scroll errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrollError {
    #[error("sampling interval must be greater than zero")]
    ZeroInterval,

    #[error("no tokio runtime available")]
    NoRuntime,

    #[error("scroll broadcaster stopped")]
    Closed,
}

impl From<ScrollError> for ParallaxError {
    fn from(err: ScrollError) -> Self {
        ParallaxError::Scroll {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Supplies the current vertical scroll position.
pub trait ScrollSource: Send + Sync + 'static {
    fn scroll_position(&self) -> f64;
}

impl<F> ScrollSource for F
where
    F: Fn() -> f64 + Send + Sync + 'static,
{
    fn scroll_position(&self) -> f64 {
        self()
    }
}

/// A changed scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub position: f64,
}

struct Shared {
    source: Arc<dyn ScrollSource>,
    interval: Duration,
    sender: broadcast::Sender<ScrollEvent>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    running: Weak<Running>,
    last_position: Option<f64>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The sampling task, alive while any subscription holds it.
struct Running {
    task: JoinHandle<()>,
}

impl Drop for Running {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Scroll sampling stopped");
    }
}

/// Reference-counted scroll sampling service.
///
/// Cloning is cheap and clones share the same sampling task.
#[derive(Clone)]
pub struct ScrollBroadcaster {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ScrollBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollBroadcaster")
            .field("interval", &self.shared.interval)
            .field("subscribers", &self.subscriber_count())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl ScrollBroadcaster {
    /// Create a broadcaster sampling `source` every `interval`.
    pub fn new(source: Arc<dyn ScrollSource>, interval: Duration) -> Result<Self, ScrollError> {
        if interval.is_zero() {
            return Err(ScrollError::ZeroInterval);
        }

        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Ok(Self {
            shared: Arc::new(Shared {
                source,
                interval,
                sender,
                state: Mutex::new(State::default()),
            }),
        })
    }

    /// Create a broadcaster using the sampling interval from `settings`.
    pub fn from_settings(
        source: Arc<dyn ScrollSource>,
        settings: &ParallaxSettings,
    ) -> Result<Self, ScrollError> {
        Self::new(source, settings.interval())
    }

    /// Subscribe to scroll changes, starting the sampling task if needed.
    ///
    /// Must be called within a tokio runtime.
    pub fn subscribe(&self) -> Result<ScrollSubscription, ScrollError> {
        let mut state = self.shared.state();

        let running = match state.running.upgrade() {
            Some(running) => running,
            None => {
                let runtime = tokio::runtime::Handle::try_current().map_err(|_| ScrollError::NoRuntime)?;
                state.last_position = None;
                let task = runtime.spawn(sample(Arc::clone(&self.shared)));
                let running = Arc::new(Running { task });
                state.running = Arc::downgrade(&running);
                debug!(interval = ?self.shared.interval, "Scroll sampling started");
                running
            }
        };

        Ok(ScrollSubscription {
            receiver: self.shared.sender.subscribe(),
            _running: running,
        })
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.sender.receiver_count()
    }

    /// Whether the sampling task is active.
    pub fn is_running(&self) -> bool {
        self.shared.state().running.strong_count() > 0
    }

    /// Last position broadcast by the current sampling task.
    pub fn last_position(&self) -> Option<f64> {
        self.shared.state().last_position
    }

    /// Read the source directly, bypassing change detection.
    pub fn current_position(&self) -> f64 {
        self.shared.source.scroll_position()
    }
}

async fn sample(shared: Arc<Shared>) {
    let mut ticker = tokio::time::interval(shared.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let position = shared.source.scroll_position();
        let changed = {
            let mut state = shared.state();
            if state.last_position == Some(position) {
                false
            } else {
                state.last_position = Some(position);
                true
            }
        };

        if changed {
            trace!(position, "Scroll position changed");
            // No receivers is fine; the task is about to be aborted.
            let _ = shared.sender.send(ScrollEvent { position });
        }
    }
}

/// A live subscription. Dropping the last one stops sampling.
pub struct ScrollSubscription {
    receiver: broadcast::Receiver<ScrollEvent>,
    _running: Arc<Running>,
}

impl std::fmt::Debug for ScrollSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSubscription").finish_non_exhaustive()
    }
}

impl ScrollSubscription {
    /// Wait for the next changed position.
    ///
    /// A subscriber that fell behind skips straight to the newest events.
    pub async fn recv(&mut self) -> Result<ScrollEvent, ScrollError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Ok(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    trace!(skipped, "Scroll subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(ScrollError::Closed),
            }
        }
    }

    /// Take an already delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<ScrollEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
