//! Cancellable debounce timer.
//!
//! Rescheduling cancels the previously pending task, so of any burst of
//! `schedule` calls only the most recent one fires once the quiet period
//! elapses. Cancellation never touches work that already started running.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a single scheduled task.
struct DebounceHandle {
    token: CancellationToken,
    // Never awaited; the task exits on cancel or after firing.
    _task: JoinHandle<()>,
}

impl DebounceHandle {
    /// Cancel the task if its delay has not elapsed yet.
    fn cancel(&self) {
        self.token.cancel();
    }
}

/// A one-slot scheduler implementing last-keystroke-wins debouncing.
#[derive(Default)]
pub struct Debouncer {
    pending: Mutex<Option<DebounceHandle>>,
}

impl Debouncer {
    /// Create an idle debouncer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `work` to run after `delay`, cancelling any previously
    /// scheduled work that has not fired yet.
    pub fn schedule<F>(&self, delay: Duration, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let fired = token.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                () = fired.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    work.await;
                }
            }
        });

        let handle = DebounceHandle { token, _task: task };
        let previous = self
            .pending
            .lock()
            .expect("acquire debouncer lock")
            .replace(handle);

        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Cancel the pending task, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().expect("acquire debouncer lock").take() {
            handle.cancel();
        }
    }
}
