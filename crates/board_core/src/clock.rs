//! Per-second wall clock for the board header.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Running clock task. Dropping the handle stops the ticks.
#[derive(Debug)]
pub struct ClockTicker {
    task: Option<JoinHandle<()>>,
}

impl ClockTicker {
    /// Calls `on_tick` with the current instant every `interval`, starting one
    /// interval from now. Late ticks are skipped, not replayed.
    pub fn start<F>(runtime: &Handle, interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(DateTime<Utc>) + Send + 'static,
    {
        let task = runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                on_tick(Utc::now());
            }
        });
        debug!(interval_ms = interval.as_millis() as u64, "clock: ticker started");
        Self { task: Some(task) }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("clock: ticker cancelled");
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let _clock = ClockTicker::start(&Handle::current(), Duration::from_secs(1), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_clock_stops_ticking() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let mut clock = ClockTicker::start(&Handle::current(), Duration::from_secs(1), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        clock.cancel();
        clock.cancel();
        assert!(!clock.is_running());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_releases_the_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let clock = ClockTicker::start(&Handle::current(), Duration::from_secs(1), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        drop(clock);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
