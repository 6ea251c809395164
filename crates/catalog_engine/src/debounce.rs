use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Single-slot cancellable timer: scheduling replaces whatever was pending.
///
/// The pending task is aborted when the timer is dropped.
pub struct DebounceTimer {
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        }));
    }

    /// Returns whether a timer that had not fired yet was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(task) => {
                let was_pending = !task.is_finished();
                task.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
