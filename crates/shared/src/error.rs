use serde::{Deserialize, Serialize};

/// Error body returned by the notification backend on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub detail: String,
}

impl ApiErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// Extracts `detail` from a raw response body, falling back to the body
    /// itself when it is not the expected JSON shape.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str::<Self>(body).unwrap_or_else(|_| Self::new(body.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_detail_from_json_body() {
        let detail = ApiErrorDetail::from_body(r#"{"detail":"Failed to send WhatsApp message: boom"}"#);
        assert_eq!(detail.detail, "Failed to send WhatsApp message: boom");
    }

    #[test]
    fn falls_back_to_raw_body() {
        let detail = ApiErrorDetail::from_body("  Bad Gateway \n");
        assert_eq!(detail.detail, "Bad Gateway");
    }
}
