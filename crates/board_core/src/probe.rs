//! Best-effort liveness probe against the notification backend.
//!
//! Runs once at mount and then on a fixed interval so a sleeping backend is
//! awake by the time the claim message goes out. Failures are logged at debug
//! level and otherwise swallowed.

use std::time::Duration;

use reqwest::Client;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::debug;

#[derive(Debug)]
pub struct KeepAlive {
    task: Option<JoinHandle<()>>,
}

impl KeepAlive {
    pub fn start(
        runtime: &Handle,
        http: Client,
        api_base: String,
        every: Duration,
        timeout: Duration,
    ) -> Self {
        let task = runtime.spawn(async move {
            let mut ticks = interval(every);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                probe_once(&http, &api_base, timeout).await;
            }
        });
        Self { task: Some(task) }
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Issues a single `GET {api_base}/`. Returns whether the backend answered
/// with a success status; callers are free to ignore the result.
pub async fn probe_once(http: &Client, api_base: &str, timeout: Duration) -> bool {
    let result = http
        .get(format!("{api_base}/"))
        .timeout(timeout)
        .send()
        .await
        .and_then(|response| response.error_for_status());
    match result {
        Ok(_) => {
            debug!(api_base, "probe: backend is awake");
            true
        }
        Err(err) => {
            debug!(api_base, error = %err, "probe: backend wake-up call failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use axum::{extract::State, routing::get, Json, Router};
    use shared::protocol::RootGreeting;
    use tokio::net::TcpListener;

    async fn greet(State(hits): State<Arc<AtomicUsize>>) -> Json<RootGreeting> {
        hits.fetch_add(1, Ordering::SeqCst);
        Json(RootGreeting {
            message: "Hello World".to_string(),
        })
    }

    async fn spawn_root_server() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/api/", get(greet))
            .with_state(hits.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}/api"), hits)
    }

    #[tokio::test]
    async fn probe_reports_live_backend() {
        let (api_base, hits) = spawn_root_server().await;
        assert!(probe_once(&Client::new(), &api_base, Duration::from_secs(2)).await);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn probe_swallows_unreachable_backend() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let alive = probe_once(
            &Client::new(),
            &format!("http://{addr}/api"),
            Duration::from_millis(500),
        )
        .await;
        assert!(!alive);
    }

    #[tokio::test]
    async fn keep_alive_probes_immediately_and_stops_on_cancel() {
        let (api_base, hits) = spawn_root_server().await;
        let mut keep_alive = KeepAlive::start(
            &Handle::current(),
            Client::new(),
            api_base,
            Duration::from_secs(300),
            Duration::from_secs(2),
        );

        for _ in 0..50 {
            if hits.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        keep_alive.cancel();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
