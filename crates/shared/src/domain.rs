use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown wherever a claim has not been filed or paid.
pub const CLAIM_SENTINEL: &str = "-";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(FlightId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightStatus {
    #[serde(rename = "On Time")]
    OnTime,
    Delayed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl FlightStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTime => "On Time",
            Self::Delayed => "Delayed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    Paid,
}

impl ClaimStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
        }
    }
}

/// A departure time as supplied by the feed: either an absolute instant or an
/// opaque string that is displayed as-is (`"N/A"`, `"28:45"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DepartureTime {
    At(DateTime<Utc>),
    Display(String),
}

impl DepartureTime {
    pub fn display(text: impl Into<String>) -> Self {
        Self::Display(text.into())
    }
}

/// One claim column of a flight row. `Sentinel` means no claim yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ClaimField<T> {
    Sentinel,
    Value(T),
}

impl<T> Default for ClaimField<T> {
    fn default() -> Self {
        Self::Sentinel
    }
}

impl<T> ClaimField<T> {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Sentinel => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl ClaimField<String> {
    pub fn display(&self) -> &str {
        self.value().map(String::as_str).unwrap_or(CLAIM_SENTINEL)
    }
}

impl ClaimField<ClaimStatus> {
    pub fn display(&self) -> &str {
        self.value()
            .map(ClaimStatus::label)
            .unwrap_or(CLAIM_SENTINEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub id: FlightId,
    pub policy_number: String,
    pub travellers: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub flight_number: String,
    pub route: String,
    pub flight_status: FlightStatus,
    pub expected_departure: DepartureTime,
    pub actual_departure: DepartureTime,
    #[serde(default)]
    pub claim_number: ClaimField<String>,
    #[serde(default)]
    pub claim_status: ClaimField<ClaimStatus>,
    #[serde(default)]
    pub claim_paid_amount: ClaimField<String>,
}

impl FlightRecord {
    pub fn has_claim(&self) -> bool {
        !self.claim_number.is_sentinel()
    }
}

/// The claim columns written onto a record when a claim is paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPayment {
    pub claim_number: String,
    pub status: ClaimStatus,
    pub paid_amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_status_uses_board_labels_on_the_wire() {
        let encoded = serde_json::to_string(&FlightStatus::OnTime).expect("encode");
        assert_eq!(encoded, "\"On Time\"");

        let decoded: FlightStatus = serde_json::from_str("\"Diverted\"").expect("decode");
        assert_eq!(decoded, FlightStatus::Unknown);
    }

    #[test]
    fn sentinel_claim_fields_display_placeholder() {
        assert_eq!(ClaimField::<String>::Sentinel.display(), CLAIM_SENTINEL);
        assert_eq!(ClaimField::<ClaimStatus>::Sentinel.display(), CLAIM_SENTINEL);
        assert_eq!(ClaimField::Value(ClaimStatus::Paid).display(), "Paid");
        assert_eq!(ClaimField::Value("$150".to_string()).display(), "$150");
    }

    #[test]
    fn departure_time_keeps_display_strings_untouched() {
        let raw = serde_json::json!({ "kind": "display", "value": "28:45" });
        let decoded: DepartureTime = serde_json::from_value(raw).expect("decode");
        assert_eq!(decoded, DepartureTime::display("28:45"));
    }
}
