//! Order gateway port for the external payment processor.
//!
//! The processor owns the checkout itself. This service only asks it to
//! open an order and hands the resulting order id to the client.
//!
//! # Design
//!
//! - **Minor units**: Amounts crossing this port are already in paise
//! - **No retries**: A failed call surfaces immediately as an upstream error

use std::collections::BTreeMap;

use crate::domain::foundation::{DomainError, ErrorCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for creating orders at the payment processor.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order the customer can pay against.
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` if the API keys are rejected
    /// - `BadRequest` if the processor rejects the order parameters
    /// - `NetworkError` on transport failure
    async fn create_order(&self, request: CreateProcessorOrder)
        -> Result<ProcessorOrder, PaymentError>;

    /// Public key id the client-side checkout needs.
    fn key_id(&self) -> &str;
}

/// Request to open an order at the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProcessorOrder {
    /// Amount in minor units.
    pub amount: i64,

    /// ISO currency code.
    pub currency: String,

    /// Merchant receipt reference.
    pub receipt: String,

    /// Free-form key/value notes stored with the order.
    pub notes: BTreeMap<String, String>,
}

/// Order as returned by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorOrder {
    /// Processor's order id (`order_...`).
    pub id: String,

    /// Amount in minor units.
    pub amount: i64,

    pub currency: String,
}

/// Errors from processor operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Processor's error code (if available).
    pub provider_code: Option<String>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    /// Attach the processor's own error code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::BadRequest, message)
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let mut domain = DomainError::new(ErrorCode::ExternalServiceError, err.message)
            .with_detail("payment_error_code", err.code.to_string());
        if let Some(provider_code) = err.provider_code {
            domain = domain.with_detail("provider_code", provider_code);
        }
        domain
    }
}

/// Processor error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Processor rejected the request parameters.
    BadRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Processor-side failure or unreadable response.
    ProviderError,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::BadRequest => "bad_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
