use serde::{Deserialize, Serialize};

use crate::domain::FlightRecord;

/// Body of `POST /api/send-whatsapp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPaidMessage {
    pub to_number: String,
    pub claim_number: String,
    pub amount: String,
    pub flight_number: String,
    pub traveller_name: String,
}

impl ClaimPaidMessage {
    /// Builds the outbound message for a paid claim. Returns `None` when the
    /// record has no recipient or its claim columns are still sentinels.
    pub fn from_record(record: &FlightRecord) -> Option<Self> {
        Some(Self {
            to_number: record.phone_number.clone()?,
            claim_number: record.claim_number.value()?.clone(),
            amount: record.claim_paid_amount.value()?.clone(),
            flight_number: record.flight_number.clone(),
            traveller_name: record.travellers.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPaidResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_sid: Option<String>,
}

/// Response of the backend root route, used as a liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootGreeting {
    pub message: String,
}
