//! Outbound claim-paid message delivery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::FlightRecord,
    error::ApiErrorDetail,
    protocol::{ClaimPaidMessage, ClaimPaidResponse},
};
use thiserror::Error;
use tracing::{info, warn};

pub fn send_claim_message_route() -> &'static str {
    "/send-whatsapp"
}

/// Acknowledgement from the messaging backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyAck {
    pub message: String,
    pub message_sid: Option<String>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("record for flight {flight_number} has no recipient or unpaid claim fields")]
    Incomplete { flight_number: String },
    #[error("notification request timed out")]
    Timeout,
    #[error("notification transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("notification backend returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("notification backend rejected the message: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

#[async_trait]
pub trait ClaimNotifier: Send + Sync {
    async fn notify(&self, record: &FlightRecord) -> Result<NotifyAck, NotifyError>;
}

/// Delivers claim messages through the backend's `/send-whatsapp` route.
#[derive(Debug, Clone)]
pub struct HttpClaimNotifier {
    http: Client,
    api_base: String,
}

impl HttpClaimNotifier {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifyError::Transport)?;
        Ok(Self::with_client(http, api_base))
    }

    pub fn with_client(http: Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl ClaimNotifier for HttpClaimNotifier {
    async fn notify(&self, record: &FlightRecord) -> Result<NotifyAck, NotifyError> {
        let message =
            ClaimPaidMessage::from_record(record).ok_or_else(|| NotifyError::Incomplete {
                flight_number: record.flight_number.clone(),
            })?;

        info!(
            flight_number = %message.flight_number,
            claim_number = %message.claim_number,
            "notify: sending claim-paid message"
        );
        let response = self
            .http
            .post(format!("{}{}", self.api_base, send_claim_message_route()))
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = ApiErrorDetail::from_body(&body).detail;
            warn!(status = status.as_u16(), %detail, "notify: backend refused message");
            return Err(NotifyError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ClaimPaidResponse = response.json().await?;
        if !body.success {
            return Err(NotifyError::Rejected(body.message));
        }

        info!(
            message_sid = body.message_sid.as_deref().unwrap_or("-"),
            "notify: claim-paid message accepted"
        );
        Ok(NotifyAck {
            message: body.message,
            message_sid: body.message_sid,
        })
    }
}

#[cfg(test)]
#[path = "tests/notifier_tests.rs"]
mod tests;
