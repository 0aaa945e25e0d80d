//! Customer repository port.
//!
//! Customers are keyed by their unique email. The first order for an email
//! creates the row; later orders reuse it unchanged.

use crate::domain::foundation::DomainError;
use crate::domain::payment::{Customer, NewCustomer};
use async_trait::async_trait;

/// Repository port for customer records.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Return the customer with this email, creating it if absent.
    ///
    /// Must be a single atomic operation: two concurrent calls with the same
    /// email yield the same customer id. An existing row keeps its original
    /// name and phone.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert_by_email(&self, customer: &NewCustomer) -> Result<Customer, DomainError>;
}
