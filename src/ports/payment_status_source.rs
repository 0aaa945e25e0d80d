//! Payment status source port (client side).
//!
//! Abstracts how the status poller learns the current status of an order,
//! so the polling loop can run against the HTTP API or a fake.

use crate::domain::foundation::OrderId;
use crate::domain::payment::PaymentStatus;
use async_trait::async_trait;
use thiserror::Error;

/// Source of the current status of a payment.
#[async_trait]
pub trait PaymentStatusSource: Send + Sync {
    /// Fetch the status currently recorded for the order.
    async fn fetch_status(&self, order_id: &OrderId) -> Result<PaymentStatus, StatusQueryError>;
}

/// Errors from a single status query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusQueryError {
    /// No payment exists for the order.
    #[error("Payment not found")]
    NotFound,

    /// The server answered but reported failure.
    #[error("Status query rejected: {0}")]
    Rejected(String),

    /// The server could not be reached or answered with garbage.
    #[error("Status query failed: {0}")]
    Transport(String),

    /// The client could not be set up for the given server.
    #[error("Status client misconfigured: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_source_is_object_safe() {
        fn _accepts_dyn(_source: &dyn PaymentStatusSource) {}
    }
}
