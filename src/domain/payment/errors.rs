//! Order-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | NotFound | 404 |
//! | Upstream | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, ValidationError};

/// Errors raised by order creation and payment queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Request input failed validation.
    ValidationFailed { field: String, message: String },

    /// No payment exists for this order.
    NotFound(OrderId),

    /// The payment processor rejected or failed the request.
    Upstream(String),

    /// The store failed.
    Infrastructure(String),
}

impl OrderError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        OrderError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(order_id: OrderId) -> Self {
        OrderError::NotFound(order_id)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        OrderError::Upstream(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        OrderError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            OrderError::NotFound(_) => ErrorCode::PaymentNotFound,
            OrderError::Upstream(_) => ErrorCode::ExternalServiceError,
            OrderError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns the detailed error message.
    ///
    /// Upstream and infrastructure messages are for logs only.
    pub fn message(&self) -> String {
        match self {
            OrderError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            OrderError::NotFound(order_id) => format!("Payment not found: {}", order_id),
            OrderError::Upstream(msg) => format!("Payment processor error: {}", msg),
            OrderError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the error came from a dependency rather than the caller.
    pub fn is_internal(&self) -> bool {
        matches!(self, OrderError::Upstream(_) | OrderError::Infrastructure(_))
    }
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for OrderError {}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for OrderError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => OrderError::ValidationFailed {
                field: "unknown".to_string(),
                message: err.message,
            },
            ErrorCode::ExternalServiceError => OrderError::Upstream(err.to_string()),
            _ => OrderError::Infrastructure(err.to_string()),
        }
    }
}

impl From<OrderError> for DomainError {
    fn from(err: OrderError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
