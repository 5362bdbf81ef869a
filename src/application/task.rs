use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Pending,
    Fired,
    Cancelled,
}

/// Handle to a callback deferred with [`PendingTask::schedule`].
///
/// Once [`PendingTask::cancel`] returns, the callback has either already run
/// to completion or will never run. Dropping the handle cancels it as well.
#[derive(Debug)]
pub struct PendingTask {
    state: Arc<Mutex<TaskState>>,
    handle: Option<JoinHandle<()>>,
}

impl PendingTask {
    /// Run `callback` after `delay` on the current tokio runtime.
    pub fn schedule<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let state = Arc::new(Mutex::new(TaskState::Pending));
        let task_state = Arc::clone(&state);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The lock is held while the callback runs so cancel() cannot
            // interleave with it.
            let Ok(mut state) = task_state.lock() else {
                return;
            };
            if *state == TaskState::Pending {
                *state = TaskState::Fired;
                callback();
            }
        });

        Self {
            state,
            handle: Some(handle),
        }
    }

    /// Prevent the callback from running. Returns true if it had not fired yet.
    pub fn cancel(mut self) -> bool {
        self.invalidate()
    }

    pub fn has_fired(&self) -> bool {
        self.current() == TaskState::Fired
    }

    /// Wait for the delay to elapse. Returns true if the callback ran.
    pub async fn wait(mut self) -> bool {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        self.current() == TaskState::Fired
    }

    fn current(&self) -> TaskState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(TaskState::Cancelled)
    }

    fn invalidate(&mut self) -> bool {
        let prevented = match self.state.lock() {
            Ok(mut state) if *state == TaskState::Pending => {
                *state = TaskState::Cancelled;
                true
            }
            _ => false,
        };
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        prevented
    }
}

impl Drop for PendingTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.invalidate();
        }
    }
}
