//! View-lifetime owner of the board: store, clock, selection and the timer
//! tasks that drive them.
//!
//! Timer tasks never touch board state directly. They post [`SessionEvent`]s
//! to a channel and the thread owning the [`BoardSession`] applies them via
//! [`BoardSession::pump`] or [`BoardSession::next_update`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Client;
use shared::domain::{FlightId, FlightRecord};
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use tracing::{debug, info, warn};

use crate::{
    clock::ClockTicker,
    config::{BoardSettings, ConfigError},
    notifier::{ClaimNotifier, NotifyAck, NotifyError},
    probe::KeepAlive,
    store::{seed, FlightStore},
    timer::ClaimTimer,
    view::{project, BoardView, DisplayZone, TransientSelection},
};

#[derive(Debug)]
pub enum SessionEvent {
    Tick(DateTime<Utc>),
    ClaimTimerElapsed,
    Delivery {
        flight_id: FlightId,
        outcome: Result<NotifyAck, NotifyError>,
    },
}

/// Outcome of the claim-paid message, kept for display and logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered { flight_id: FlightId, ack: NotifyAck },
    Failed { flight_id: FlightId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Tick(DateTime<Utc>),
    ClaimPaid(FlightRecord),
    ClaimSkipped,
    Delivery(DeliveryStatus),
}

pub struct BoardSession {
    runtime: Handle,
    store: FlightStore,
    now: DateTime<Utc>,
    selection: TransientSelection,
    zone: DisplayZone,
    notifier: Arc<dyn ClaimNotifier>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
    clock: Option<ClockTicker>,
    claim_timer: Option<ClaimTimer>,
    keep_alive: Option<KeepAlive>,
    last_delivery: Option<DeliveryStatus>,
    torn_down: bool,
}

impl BoardSession {
    /// Seeds the board from `now` and starts the clock, the claim timer and,
    /// when enabled, the backend keep-alive probe.
    pub fn mount(
        runtime: &Handle,
        settings: &BoardSettings,
        notifier: Arc<dyn ClaimNotifier>,
        now: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        Self::mount_with_records(runtime, settings, notifier, now, seed(now))
    }

    pub fn mount_with_records(
        runtime: &Handle,
        settings: &BoardSettings,
        notifier: Arc<dyn ClaimNotifier>,
        now: DateTime<Utc>,
        records: Vec<FlightRecord>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let zone = settings.display_zone()?;
        let api_base = settings.api_base()?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let tick_tx = events_tx.clone();
        let clock = ClockTicker::start(runtime, settings.clock_interval(), move |instant| {
            let _ = tick_tx.send(SessionEvent::Tick(instant));
        });

        let claim_tx = events_tx.clone();
        let claim_timer = ClaimTimer::schedule(runtime, settings.claim_delay(), move || {
            let _ = claim_tx.send(SessionEvent::ClaimTimerElapsed);
        });

        let keep_alive = settings.probe_enabled.then(|| {
            KeepAlive::start(
                runtime,
                Client::new(),
                api_base.clone(),
                settings.keep_alive_interval(),
                settings.probe_timeout(),
            )
        });

        info!(
            %api_base,
            claim_delay_ms = settings.claim_delay_ms,
            zone = zone.label(),
            "session: board mounted"
        );

        Ok(Self {
            runtime: runtime.clone(),
            store: FlightStore::from_records(records),
            now,
            selection: TransientSelection::default(),
            zone,
            notifier,
            events_tx,
            events_rx,
            clock: Some(clock),
            claim_timer: Some(claim_timer),
            keep_alive,
            last_delivery: None,
            torn_down: false,
        })
    }

    /// Applies every event queued so far without waiting.
    pub fn pump(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(update) = self.apply(event) {
                updates.push(update);
            }
        }
        updates
    }

    /// Waits for and applies the next event. Returns `None` once the session
    /// has been torn down.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        while !self.torn_down {
            let event = self.events_rx.recv().await?;
            if let Some(update) = self.apply(event) {
                return Some(update);
            }
        }
        None
    }

    fn apply(&mut self, event: SessionEvent) -> Option<SessionUpdate> {
        if self.torn_down {
            debug!(?event, "session: dropping event after teardown");
            return None;
        }

        match event {
            SessionEvent::Tick(instant) => {
                self.now = instant;
                Some(SessionUpdate::Tick(instant))
            }
            SessionEvent::ClaimTimerElapsed => {
                self.claim_timer = None;
                match self.store.apply_scripted_claim() {
                    Some(record) => {
                        self.selection.show_notification();
                        self.dispatch_notification(record.clone());
                        Some(SessionUpdate::ClaimPaid(record))
                    }
                    None => Some(SessionUpdate::ClaimSkipped),
                }
            }
            SessionEvent::Delivery { flight_id, outcome } => {
                let status = match outcome {
                    Ok(ack) => {
                        info!(
                            flight_id = flight_id.0,
                            message_sid = ack.message_sid.as_deref().unwrap_or("-"),
                            "session: claim message delivered"
                        );
                        DeliveryStatus::Delivered { flight_id, ack }
                    }
                    Err(err) => {
                        warn!(flight_id = flight_id.0, error = %err, "session: claim message failed");
                        DeliveryStatus::Failed {
                            flight_id,
                            reason: err.to_string(),
                        }
                    }
                };
                self.last_delivery = Some(status.clone());
                Some(SessionUpdate::Delivery(status))
            }
        }
    }

    /// Fire-and-forget: the board never waits on the outcome.
    fn dispatch_notification(&self, record: FlightRecord) {
        let notifier = self.notifier.clone();
        let events_tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = notifier.notify(&record).await;
            let _ = events_tx.send(SessionEvent::Delivery {
                flight_id: record.id,
                outcome,
            });
        });
    }

    pub fn select_claim(&mut self, id: FlightId) -> bool {
        match self.store.get(id) {
            Some(record) => self.selection.select_claim(record),
            None => false,
        }
    }

    pub fn close_claim_detail(&mut self) {
        self.selection.close_claim_detail();
    }

    pub fn dismiss_notification(&mut self) {
        self.selection.dismiss_notification();
    }

    pub fn view(&self) -> BoardView {
        project(
            self.store.records(),
            self.now,
            &self.selection,
            self.store.last_mutated(),
            &self.zone,
        )
    }

    pub fn records(&self) -> &[FlightRecord] {
        self.store.records()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn selection(&self) -> &TransientSelection {
        &self.selection
    }

    pub fn last_delivery(&self) -> Option<&DeliveryStatus> {
        self.last_delivery.as_ref()
    }

    pub fn claim_pending(&self) -> bool {
        self.claim_timer.as_ref().is_some_and(ClaimTimer::is_pending)
    }

    /// Stops the clock, the pending claim and the probe. Safe to call more
    /// than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(mut clock) = self.clock.take() {
            clock.cancel();
        }
        if let Some(mut timer) = self.claim_timer.take() {
            timer.cancel();
        }
        if let Some(mut keep_alive) = self.keep_alive.take() {
            keep_alive.cancel();
        }
        info!("session: board torn down");
    }
}

impl Drop for BoardSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
