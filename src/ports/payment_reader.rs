//! Payment reader port (read side).
//!
//! Listing views join each payment with the contact details of its
//! customer.

use crate::domain::foundation::DomainError;
use crate::domain::payment::Payment;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader port for payment listings.
#[async_trait]
pub trait PaymentReader: Send + Sync {
    /// All payments with their customer, newest first.
    async fn list_with_customers(&self) -> Result<Vec<PaymentSummary>, DomainError>;
}

/// A payment together with the customer it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSummary {
    pub payment: Payment,

    /// `None` only if the customer row has gone missing.
    pub customer: Option<CustomerContact>,
}

/// Contact fields shown alongside a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
}
