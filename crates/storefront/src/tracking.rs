//! Simulated order progression.
//!
//! An [`OrderTracker`] owns a tokio task that moves an order one status
//! forward every dwell interval until it is out for delivery. Delivery and
//! cancellation only happen through explicit calls. The current progress is
//! published on a `watch` channel, so reading it never has side effects.
//!
//! Dropping the tracker (or calling [`OrderTracker::stop`]) cancels the task;
//! no transition fires after that.

use std::sync::Arc;
use std::time::Duration;

use campus_eats_core::{OrderProgress, OrderStatus, TransitionError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Last status the timer reaches on its own.
pub const AUTO_ADVANCE_LIMIT: OrderStatus = OrderStatus::OutForDelivery;

const fn auto_advances(status: OrderStatus) -> bool {
    !status.is_terminal() && !matches!(status, AUTO_ADVANCE_LIMIT)
}

/// Drives one order through its statuses on a timer.
#[derive(Debug)]
pub struct OrderTracker {
    progress: Arc<watch::Sender<OrderProgress>>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl OrderTracker {
    /// Start tracking from `initial`, advancing after every `dwell`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(initial: OrderProgress, dwell: Duration) -> Self {
        let (progress, _) = watch::channel(initial);
        let progress = Arc::new(progress);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(run(Arc::clone(&progress), shutdown_rx, dwell));

        Self {
            progress,
            shutdown,
            task: Some(task),
        }
    }

    /// Current progress.
    #[must_use]
    pub fn snapshot(&self) -> OrderProgress {
        *self.progress.borrow()
    }

    /// Receiver notified on every status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OrderProgress> {
        self.progress.subscribe()
    }

    /// Mark an out-for-delivery order as delivered.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` unless the order is out for delivery.
    pub fn confirm_delivery(&self) -> Result<OrderProgress, TransitionError> {
        self.transition(OrderStatus::Delivered)
    }

    /// Cancel the order, freezing its progress value.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::Terminal` if already delivered or cancelled.
    pub fn cancel(&self) -> Result<OrderProgress, TransitionError> {
        self.transition(OrderStatus::Cancelled)
    }

    /// Whether the timer task is still scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel any pending automatic transition.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = self.shutdown.send(true);
            task.abort();
        }
    }

    fn transition(&self, target: OrderStatus) -> Result<OrderProgress, TransitionError> {
        let mut result = Ok(());
        self.progress.send_if_modified(|progress| {
            result = progress.advance_to(target);
            result.is_ok()
        });
        result?;

        let snapshot = self.snapshot();
        debug!(status = %snapshot.status, "Order status set explicitly");
        Ok(snapshot)
    }
}

impl Drop for OrderTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(
    progress: Arc<watch::Sender<OrderProgress>>,
    mut shutdown: watch::Receiver<bool>,
    dwell: Duration,
) {
    while auto_advances(progress.borrow().status) {
        tokio::select! {
            () = tokio::time::sleep(dwell) => {}
            _ = shutdown.changed() => break,
        }

        let mut advanced = None;
        progress.send_if_modified(|p| {
            if !auto_advances(p.status) {
                return false;
            }
            advanced = p.advance().ok();
            advanced.is_some()
        });

        if let Some(status) = advanced {
            debug!(%status, "Order status advanced");
        }
    }
}
