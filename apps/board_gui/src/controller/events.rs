//! UI actions and status-line modeling for the board window.

use board_core::{BoardSession, DeliveryStatus, SessionUpdate};
use shared::domain::FlightId;

/// User input collected during a frame and applied once drawing is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    OpenClaim(FlightId),
    CloseClaimDialog,
    DismissNotification,
}

pub fn apply_action(session: &mut BoardSession, action: UiAction) {
    match action {
        UiAction::OpenClaim(id) => {
            session.select_claim(id);
        }
        UiAction::CloseClaimDialog => session.close_claim_detail(),
        UiAction::DismissNotification => session.dismiss_notification(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub severity: StatusSeverity,
    pub message: String,
}

impl StatusLine {
    fn info(message: impl Into<String>) -> Self {
        Self {
            severity: StatusSeverity::Info,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: StatusSeverity::Warning,
            message: message.into(),
        }
    }
}

/// Status text for updates worth surfacing. Clock ticks return `None`.
pub fn describe_update(update: &SessionUpdate) -> Option<StatusLine> {
    match update {
        SessionUpdate::Tick(_) => None,
        SessionUpdate::ClaimPaid(record) => Some(StatusLine::info(format!(
            "Claim {} paid on flight {}",
            record.claim_number.display(),
            record.flight_number
        ))),
        SessionUpdate::ClaimSkipped => Some(StatusLine::warning(
            "Scheduled claim skipped: target flight is not on the board",
        )),
        SessionUpdate::Delivery(DeliveryStatus::Delivered { ack, .. }) => {
            Some(StatusLine::info(match ack.message_sid.as_deref() {
                Some(sid) => format!("Claim message sent ({sid})"),
                None => "Claim message sent".to_string(),
            }))
        }
        SessionUpdate::Delivery(DeliveryStatus::Failed { reason, .. }) => {
            Some(StatusLine::warning(classify_delivery_failure(reason)))
        }
    }
}

pub fn classify_delivery_failure(reason: &str) -> String {
    let lower = reason.to_ascii_lowercase();
    if lower.contains("timed out") {
        "Claim message timed out; the claim itself is still recorded.".to_string()
    } else if lower.contains("transport") || lower.contains("connect") {
        "Notification backend unreachable; the claim itself is still recorded.".to_string()
    } else {
        format!("Claim message failed: {reason}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use board_core::{ClaimNotifier, NotifyAck, NotifyError};
    use shared::domain::FlightRecord;
    use tokio::runtime::Handle;

    struct SilentNotifier;

    #[async_trait]
    impl ClaimNotifier for SilentNotifier {
        async fn notify(&self, _record: &FlightRecord) -> Result<NotifyAck, NotifyError> {
            Ok(NotifyAck {
                message: "ok".to_string(),
                message_sid: None,
            })
        }
    }

    #[test]
    fn ticks_do_not_touch_the_status_line() {
        assert_eq!(describe_update(&SessionUpdate::Tick(Default::default())), None);
    }

    #[test]
    fn delivery_failures_are_warnings_with_readable_text() {
        let line = describe_update(&SessionUpdate::Delivery(DeliveryStatus::Failed {
            flight_id: FlightId(1),
            reason: "notification request timed out".to_string(),
        }))
        .expect("status line");
        assert_eq!(line.severity, StatusSeverity::Warning);
        assert!(line.message.starts_with("Claim message timed out"));

        assert_eq!(
            classify_delivery_failure("notification backend returned 500: boom"),
            "Claim message failed: notification backend returned 500: boom"
        );
    }

    #[test]
    fn delivered_message_mentions_the_sid() {
        let line = describe_update(&SessionUpdate::Delivery(DeliveryStatus::Delivered {
            flight_id: FlightId(1),
            ack: NotifyAck {
                message: "sent".to_string(),
                message_sid: Some("SM123".to_string()),
            },
        }))
        .expect("status line");
        assert_eq!(line, StatusLine::info("Claim message sent (SM123)"));
    }

    #[tokio::test(start_paused = true)]
    async fn actions_drive_the_claim_dialog_and_toast() {
        let settings = board_core::BoardSettings {
            probe_enabled: false,
            ..Default::default()
        };
        let mut session = BoardSession::mount(
            &Handle::current(),
            &settings,
            Arc::new(SilentNotifier),
            Default::default(),
        )
        .expect("mount");

        apply_action(&mut session, UiAction::OpenClaim(FlightId(1)));
        assert!(session.view().claim_detail.is_none());

        apply_action(&mut session, UiAction::OpenClaim(FlightId(2)));
        assert_eq!(
            session.view().claim_detail.map(|detail| detail.flight_number),
            Some("BG498".to_string())
        );

        apply_action(&mut session, UiAction::CloseClaimDialog);
        assert!(session.view().claim_detail.is_none());

        apply_action(&mut session, UiAction::DismissNotification);
        assert!(session.view().notification.is_none());
    }
}
