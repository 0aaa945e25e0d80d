//! Webhook error types for Razorpay webhook handling.
//!
//! Defines the error conditions of webhook processing together with the
//! HTTP status each one is acknowledged with.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature header was absent or unreadable.
    #[error("Missing signature")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Failed to parse the webhook payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the request could not be authenticated.
    ///
    /// Only these errors are surfaced to the processor as a rejection;
    /// everything after verification is acknowledged.
    pub fn is_authenticity_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingSignature | WebhookError::InvalidSignature
        )
    }

    /// Maps the error to the HTTP status returned to the processor.
    ///
    /// Razorpay retries anything that is not 2xx, so verified deliveries are
    /// always answered with 200.
    pub fn status_code(&self) -> StatusCode {
        if self.is_authenticity_failure() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_signature_displays_correctly() {
        assert_eq!(WebhookError::InvalidSignature.to_string(), "Invalid signature");
    }

    #[test]
    fn missing_field_displays_field_name() {
        let err = WebhookError::MissingField("payload.payment.entity");
        assert_eq!(err.to_string(), "Missing field: payload.payment.entity");
    }

    #[test]
    fn signature_failures_are_rejected_with_bad_request() {
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn post_verification_failures_are_acknowledged() {
        assert_eq!(
            WebhookError::ParseError("bad json".to_string()).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            WebhookError::Database("connection lost".to_string()).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            WebhookError::MissingField("order_id").status_code(),
            StatusCode::OK
        );
    }

    #[test]
    fn only_signature_errors_are_authenticity_failures() {
        assert!(WebhookError::InvalidSignature.is_authenticity_failure());
        assert!(!WebhookError::Database("x".to_string()).is_authenticity_failure());
    }
}
