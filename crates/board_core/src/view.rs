//! Pure projection of board state into what the table, the claim dialog and
//! the notification toast display.

use chrono::{DateTime, FixedOffset, Offset as _, Utc};
use shared::domain::{DepartureTime, FlightId, FlightRecord, FlightStatus, CLAIM_SENTINEL};

pub const NOTIFICATION_SENDER: &str = "Jiffy Jane";

/// Named fixed-offset zone that all times on the board are shown in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayZone {
    label: String,
    name: String,
    offset: FixedOffset,
}

impl DisplayZone {
    /// Zone shown as "Local Time (label)" until given a name.
    pub fn new(label: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            label: label.into(),
            name: "Local Time".to_string(),
            offset,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn caption(&self) -> String {
        format!("{} ({})", self.name, self.label)
    }

    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        let offset = FixedOffset::east_opt(8 * 60 * 60).unwrap_or_else(|| Utc.fix());
        Self::new("SGT", offset).with_name("Singapore Time")
    }
}

/// `HH:MM` in the display zone for instants; display strings pass through
/// untouched, malformed or not.
pub fn format_departure(time: &DepartureTime, zone: &DisplayZone) -> String {
    match time {
        DepartureTime::At(instant) => zone.localize(*instant).format("%H:%M").to_string(),
        DepartureTime::Display(text) => text.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    OnTime,
    Delayed,
    Cancelled,
    Default,
}

impl From<&FlightStatus> for StatusCategory {
    fn from(status: &FlightStatus) -> Self {
        match status {
            FlightStatus::OnTime => Self::OnTime,
            FlightStatus::Delayed => Self::Delayed,
            FlightStatus::Cancelled => Self::Cancelled,
            FlightStatus::Unknown => Self::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimCell {
    Link(String),
    Sentinel,
}

impl ClaimCell {
    pub fn text(&self) -> &str {
        match self {
            Self::Link(number) => number,
            Self::Sentinel => CLAIM_SENTINEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub id: FlightId,
    pub policy_number: String,
    pub travellers: String,
    pub flight_number: String,
    pub route: String,
    pub status_label: String,
    pub status_category: StatusCategory,
    pub expected_departure: String,
    pub actual_departure: String,
    pub claim_number: ClaimCell,
    pub claim_status: String,
    pub claim_paid_amount: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFace {
    pub caption: String,
    pub date: String,
    pub time: String,
}

impl ClockFace {
    pub fn at(now: DateTime<Utc>, zone: &DisplayZone) -> Self {
        let local = zone.localize(now);
        Self {
            caption: zone.caption(),
            date: local.format("%a, %d %b %Y").to_string(),
            time: local.format("%H:%M:%S").to_string(),
        }
    }
}

/// Claim fields shown in the detail dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDetail {
    pub claim_number: String,
    pub flight_number: String,
    pub status: String,
    pub amount: String,
}

impl ClaimDetail {
    pub fn message(&self) -> String {
        paid_message(&self.amount)
    }
}

fn paid_message(amount: &str) -> String {
    format!("A new claim of {amount} has successfully been paid.")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationToast {
    pub sender: String,
    pub body: String,
}

/// UI-only state: the claim open in the detail dialog and whether the
/// claim-paid toast is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransientSelection {
    selected_claim: Option<ClaimDetail>,
    notification_visible: bool,
}

impl TransientSelection {
    /// Opens the detail dialog for `record`. Records without a claim number
    /// leave the selection untouched and return `false`.
    pub fn select_claim(&mut self, record: &FlightRecord) -> bool {
        let Some(claim_number) = record.claim_number.value() else {
            return false;
        };
        self.selected_claim = Some(ClaimDetail {
            claim_number: claim_number.clone(),
            flight_number: record.flight_number.clone(),
            status: record.claim_status.display().to_string(),
            amount: record.claim_paid_amount.display().to_string(),
        });
        true
    }

    pub fn close_claim_detail(&mut self) {
        self.selected_claim = None;
    }

    pub fn selected_claim(&self) -> Option<&ClaimDetail> {
        self.selected_claim.as_ref()
    }

    pub fn show_notification(&mut self) {
        self.notification_visible = true;
    }

    pub fn dismiss_notification(&mut self) {
        self.notification_visible = false;
    }

    pub fn notification_visible(&self) -> bool {
        self.notification_visible
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub clock: ClockFace,
    pub rows: Vec<BoardRow>,
    pub claim_detail: Option<ClaimDetail>,
    pub notification: Option<NotificationToast>,
}

pub fn project(
    records: &[FlightRecord],
    now: DateTime<Utc>,
    selection: &TransientSelection,
    highlighted: Option<FlightId>,
    zone: &DisplayZone,
) -> BoardView {
    let rows = records
        .iter()
        .map(|record| BoardRow {
            id: record.id,
            policy_number: record.policy_number.clone(),
            travellers: record.travellers.clone(),
            flight_number: record.flight_number.clone(),
            route: record.route.clone(),
            status_label: record.flight_status.label().to_string(),
            status_category: StatusCategory::from(&record.flight_status),
            expected_departure: format_departure(&record.expected_departure, zone),
            actual_departure: format_departure(&record.actual_departure, zone),
            claim_number: match record.claim_number.value() {
                Some(number) => ClaimCell::Link(number.clone()),
                None => ClaimCell::Sentinel,
            },
            claim_status: record.claim_status.display().to_string(),
            claim_paid_amount: record.claim_paid_amount.display().to_string(),
            highlighted: highlighted == Some(record.id),
        })
        .collect();

    let notification = selection.notification_visible().then(|| {
        let amount = highlighted
            .and_then(|id| records.iter().find(|record| record.id == id))
            .map(|record| record.claim_paid_amount.display().to_string())
            .unwrap_or_else(|| CLAIM_SENTINEL.to_string());
        NotificationToast {
            sender: NOTIFICATION_SENDER.to_string(),
            body: paid_message(&amount),
        }
    });

    BoardView {
        clock: ClockFace::at(now, zone),
        rows,
        claim_detail: selection.selected_claim().cloned(),
        notification,
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
