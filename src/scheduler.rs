//! Debounced Fetch Scheduler
//!
//! Coalesces refresh triggers: each `request_refresh` restarts the quiescence window, and
//! the action runs once the window elapses with no further trigger. When the window
//! closes before the fetcher has a transport, the pending action parks on a readiness
//! signal and runs as soon as the gate opens. Requests are never dropped while waiting.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// Opens the readiness gate.
#[derive(Debug)]
pub struct ReadinessGate {
    sender: watch::Sender<bool>,
}

impl ReadinessGate {
    pub fn open(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_open(&self) -> bool {
        *self.sender.borrow()
    }
}

/// Awaitable view of the readiness gate.
#[derive(Debug, Clone)]
pub struct Readiness {
    receiver: watch::Receiver<bool>,
}

impl Readiness {
    /// Resolves once the gate is open. Returns false if the gate was dropped while closed.
    pub async fn wait(&self) -> bool {
        let mut receiver = self.receiver.clone();
        let ready = receiver.wait_for(|ready| *ready).await.is_ok();
        ready
    }
}

pub fn readiness(open: bool) -> (ReadinessGate, Readiness) {
    let (sender, receiver) = watch::channel(open);
    (ReadinessGate { sender }, Readiness { receiver })
}

pub struct DebouncedScheduler {
    window: Duration,
    readiness: Readiness,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedScheduler {
    pub fn new(window: Duration, readiness: Readiness) -> Self {
        Self {
            window,
            readiness,
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm (or re-arm) the window; `fire` runs once it elapses quietly and the gate is open.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_refresh<F>(&self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let window = self.window;
        let readiness = self.readiness.clone();
        let mut pending = self.pending.lock();

        if let Some(previous) = pending.take() {
            if !previous.is_finished() {
                debug!(window_ms = window.as_millis() as u64, "Restarting quiescence window");
            }
            previous.abort();
        }

        *pending = Some(tokio::spawn(async move {
            sleep(window).await;
            if !readiness.wait().await {
                debug!("Readiness gate dropped; refresh abandoned");
                return;
            }
            fire();
        }));
    }

    /// Drop any armed refresh without running it.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for DebouncedScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
