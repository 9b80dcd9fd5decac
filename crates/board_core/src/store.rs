//! Seeded flight records and the one-shot scripted claim.

use chrono::{DateTime, Duration, Utc};
use shared::domain::{
    ClaimField, ClaimPayment, ClaimStatus, DepartureTime, FlightId, FlightRecord, FlightStatus,
};
use tracing::{debug, info, warn};

/// Flight whose claim is paid out by the scripted demo.
pub const SCRIPTED_FLIGHT_NUMBER: &str = "SQ656";
pub const SCRIPTED_CLAIM_NUMBER: &str = "CLM-TRV-2026-008431";
pub const SCRIPTED_CLAIM_AMOUNT: &str = "$100";

pub fn scripted_claim() -> ClaimPayment {
    ClaimPayment {
        claim_number: SCRIPTED_CLAIM_NUMBER.to_string(),
        status: ClaimStatus::Paid,
        paid_amount: SCRIPTED_CLAIM_AMOUNT.to_string(),
    }
}

struct SeedRow {
    policy: &'static str,
    traveller: &'static str,
    phone: Option<&'static str>,
    flight: &'static str,
    route: &'static str,
    status: FlightStatus,
    expected: SeedTime,
    actual: SeedTime,
    claim: Option<(&'static str, &'static str)>,
}

enum SeedTime {
    /// Offset from the seed instant, in minutes.
    Offset(i64),
    Text(&'static str),
}

impl SeedTime {
    fn resolve(&self, now: DateTime<Utc>) -> DepartureTime {
        match self {
            Self::Offset(minutes) => DepartureTime::At(now + Duration::minutes(*minutes)),
            Self::Text(text) => DepartureTime::display(*text),
        }
    }
}

fn seed_rows() -> [SeedRow; 10] {
    use SeedTime::{Offset, Text};

    [
        SeedRow {
            policy: "TRV-2026-001487",
            traveller: "Jolene Chua",
            phone: Some("+6598741945"),
            flight: SCRIPTED_FLIGHT_NUMBER,
            route: "SIN → HAK",
            status: FlightStatus::Delayed,
            expected: Offset(0),
            actual: Offset(6 * 60),
            claim: None,
        },
        SeedRow {
            policy: "TRV-2026-004392",
            traveller: "Amirul Rahman",
            phone: Some("+6591234567"),
            flight: "BG498",
            route: "SIN → DAC",
            status: FlightStatus::Delayed,
            expected: Offset(-60),
            actual: Offset(5 * 60),
            claim: Some(("CLM-TRV-2026-008420", "$100")),
        },
        SeedRow {
            policy: "TRV-2026-010234",
            traveller: "Siti Aishah",
            phone: None,
            flight: "PK312",
            route: "SIN → KHI",
            status: FlightStatus::OnTime,
            expected: Text("28:45"),
            actual: Text("28:45"),
            claim: None,
        },
        SeedRow {
            policy: "TRV-2026-009001",
            traveller: "Darren Ong",
            phone: None,
            flight: "SQ308",
            route: "SIN → MLE",
            status: FlightStatus::Cancelled,
            expected: Text("17:05"),
            actual: Text("N/A"),
            claim: Some(("CLM-TRV-2026-008424", "$150")),
        },
        SeedRow {
            policy: "TRV-2026-012145",
            traveller: "Wei Ming Tan",
            phone: None,
            flight: "SQ878",
            route: "SIN → BKK",
            status: FlightStatus::OnTime,
            expected: Offset(2 * 60),
            actual: Offset(2 * 60),
            claim: None,
        },
        SeedRow {
            policy: "TRV-2026-013567",
            traveller: "Maya Lim",
            phone: None,
            flight: "TR385",
            route: "SIN → TPE",
            status: FlightStatus::OnTime,
            expected: Offset(3 * 60 + 30),
            actual: Offset(3 * 60 + 30),
            claim: None,
        },
        SeedRow {
            policy: "TRV-2026-014892",
            traveller: "Raj Kumar",
            phone: None,
            flight: "AI346",
            route: "SIN → DEL",
            status: FlightStatus::OnTime,
            expected: Offset(90),
            actual: Offset(90),
            claim: None,
        },
        SeedRow {
            policy: "TRV-2026-015234",
            traveller: "Sarah Chen",
            phone: None,
            flight: "CX715",
            route: "SIN → HKG",
            status: FlightStatus::OnTime,
            expected: Offset(4 * 60),
            actual: Offset(4 * 60),
            claim: None,
        },
        SeedRow {
            policy: "TRV-2026-016789",
            traveller: "Ahmad Yusof",
            phone: None,
            flight: "QR944",
            route: "SIN → DOH",
            status: FlightStatus::OnTime,
            expected: Offset(5 * 60),
            actual: Offset(5 * 60),
            claim: None,
        },
        SeedRow {
            policy: "TRV-2026-017456",
            traveller: "Jessica Wong",
            phone: None,
            flight: "EK354",
            route: "SIN → DXB",
            status: FlightStatus::OnTime,
            expected: Offset(6 * 60 + 30),
            actual: Offset(6 * 60 + 30),
            claim: None,
        },
    ]
}

/// Builds the fixed ten-record board. Departure instants are offsets from
/// `now`, so the output is fully determined by `now`.
pub fn seed(now: DateTime<Utc>) -> Vec<FlightRecord> {
    seed_rows()
        .into_iter()
        .zip(1_i64..)
        .map(|(row, id)| {
            let (claim_number, claim_status, claim_paid_amount) = match row.claim {
                Some((number, amount)) => (
                    ClaimField::Value(number.to_string()),
                    ClaimField::Value(ClaimStatus::Paid),
                    ClaimField::Value(amount.to_string()),
                ),
                None => (
                    ClaimField::Sentinel,
                    ClaimField::Sentinel,
                    ClaimField::Sentinel,
                ),
            };
            FlightRecord {
                id: FlightId(id),
                policy_number: row.policy.to_string(),
                travellers: row.traveller.to_string(),
                phone_number: row.phone.map(str::to_string),
                flight_number: row.flight.to_string(),
                route: row.route.to_string(),
                flight_status: row.status,
                expected_departure: row.expected.resolve(now),
                actual_departure: row.actual.resolve(now),
                claim_number,
                claim_status,
                claim_paid_amount,
            }
        })
        .collect()
}

/// Ordered flight records for one board session.
#[derive(Debug, Clone)]
pub struct FlightStore {
    records: Vec<FlightRecord>,
    last_mutated: Option<FlightId>,
    scripted_claim_fired: bool,
}

impl FlightStore {
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::from_records(seed(now))
    }

    pub fn from_records(records: Vec<FlightRecord>) -> Self {
        debug!(records = records.len(), "store: seeded flight records");
        Self {
            records,
            last_mutated: None,
            scripted_claim_fired: false,
        }
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn get(&self, id: FlightId) -> Option<&FlightRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn last_mutated(&self) -> Option<FlightId> {
        self.last_mutated
    }

    pub fn scripted_claim_fired(&self) -> bool {
        self.scripted_claim_fired
    }

    /// Writes `payment` onto the first record flying `flight_number`, leaving
    /// every other column untouched. Returns the updated snapshot, or `None`
    /// when no record matches.
    fn apply_claim(
        &mut self,
        flight_number: &str,
        payment: ClaimPayment,
    ) -> Option<FlightRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.flight_number == flight_number)?;

        record.claim_number = ClaimField::Value(payment.claim_number);
        record.claim_status = ClaimField::Value(payment.status);
        record.claim_paid_amount = ClaimField::Value(payment.paid_amount);
        self.last_mutated = Some(record.id);

        info!(
            flight_id = record.id.0,
            flight_number = %record.flight_number,
            claim_number = record.claim_number.display(),
            "store: claim paid"
        );
        Some(record.clone())
    }

    /// Applies the scripted demo claim. Fires at most once per store: later
    /// calls return `None` even if the first lookup missed.
    pub fn apply_scripted_claim(&mut self) -> Option<FlightRecord> {
        if self.scripted_claim_fired {
            warn!("store: scripted claim already applied; ignoring repeat");
            return None;
        }
        self.scripted_claim_fired = true;

        let updated = self.apply_claim(SCRIPTED_FLIGHT_NUMBER, scripted_claim());
        if updated.is_none() {
            warn!(
                flight_number = SCRIPTED_FLIGHT_NUMBER,
                "store: scripted claim target missing; skipping"
            );
        }
        updated
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
