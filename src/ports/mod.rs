//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `CustomerRepository` - Atomic find-or-create of customers by email
//! - `PaymentRepository` - Payment rows and forward-only status changes
//! - `PaymentReader` - Payment listings joined with customers
//!
//! ## External Service Ports
//!
//! - `OrderGateway` - Order creation at the payment processor
//! - `PaymentStatusSource` - Status lookups for the client-side poller

mod customer_repository;
mod order_gateway;
mod payment_reader;
mod payment_repository;
mod payment_status_source;

pub use customer_repository::CustomerRepository;
pub use order_gateway::{
    CreateProcessorOrder, OrderGateway, PaymentError, PaymentErrorCode, ProcessorOrder,
};
pub use payment_reader::{CustomerContact, PaymentReader, PaymentSummary};
pub use payment_repository::PaymentRepository;
pub use payment_status_source::{PaymentStatusSource, StatusQueryError};
