//! Cancellable quiet-period timer.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs an action after a quiet period, at most one pending at a time.
///
/// Scheduling replaces (and aborts) any wait that has not elapsed yet.
/// Once the wait elapses the action runs to completion; work it spawns
/// is detached and never cancelled by this type.
#[derive(Debug, Default)]
pub struct Debouncer {
    /// Pending quiet-period wait.
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Creates a debouncer with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Schedules `action` to run after `delay`, cancelling any pending wait.
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Cancels the pending wait. Returns `true` if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(|handle| {
            let waiting = !handle.is_finished();
            handle.abort();
            waiting
        })
    }

    /// True while a scheduled action has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
