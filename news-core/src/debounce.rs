use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Delays delivery of a value until a quiet period has elapsed. Each
/// `trigger` aborts the previously scheduled delivery, so a burst of calls
/// delivers exactly once, carrying the last value of the burst.
///
/// The pending timer is held explicitly as a task handle rather than being
/// captured inside a closure, so `cancel` is a named operation.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::Sender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: mpsc::Sender<T>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    /// Schedule `value` for delivery after the quiet period, superseding any
    /// delivery still pending from an earlier call.
    pub fn trigger(&mut self, value: T) {
        self.cancel();
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(value).await.is_err() {
                debug!("debounce receiver dropped");
            }
        }));
    }

    /// Abort the pending delivery, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
