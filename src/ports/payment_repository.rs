//! Payment repository port (write side).
//!
//! # Design
//!
//! - **Unique order**: At most one payment row per processor order id
//! - **Forward-only**: Status changes go through a conditional update so a
//!   terminal row can never be overwritten, whatever the delivery order

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::payment::{Payment, PaymentTransition};
use async_trait::async_trait;

/// Repository port for Payment persistence.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a new payment row.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a payment for the order already exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Find the payment for a processor order.
    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, DomainError>;

    /// Apply the transition only if the row is still `pending`.
    ///
    /// Returns `true` when a row changed. `false` means the order is unknown
    /// or the row already left `pending`; callers reload to tell which.
    async fn transition_if_pending(
        &self,
        order_id: &OrderId,
        transition: &PaymentTransition,
    ) -> Result<bool, DomainError>;
}
