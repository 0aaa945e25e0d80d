//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresCustomerRepository` - Atomic customer upsert by email
//! - `PostgresPaymentRepository` - Payment rows, conditional status updates
//!   and the joined payment listing
//!
//! Schema lives in `migrations/` at the crate root.

mod customer_repository;
mod payment_repository;

pub use customer_repository::PostgresCustomerRepository;
pub use payment_repository::PostgresPaymentRepository;
