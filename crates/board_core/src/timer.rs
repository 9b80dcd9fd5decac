//! One-shot timer that triggers the scripted claim.

use std::time::Duration;

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::debug;

/// Pending claim trigger. Cancelling or dropping it before the delay elapses
/// guarantees `on_elapsed` never runs.
#[derive(Debug)]
pub struct ClaimTimer {
    task: Option<JoinHandle<()>>,
}

impl ClaimTimer {
    pub fn schedule<F>(runtime: &Handle, delay: Duration, on_elapsed: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_elapsed();
        });
        debug!(delay_ms = delay.as_millis() as u64, "timer: claim scheduled");
        Self { task: Some(task) }
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!("timer: pending claim cancelled");
            }
            task.abort();
        }
    }
}

impl Drop for ClaimTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
