//! In-memory persistence adapter.
//!
//! Implements the customer and payment ports over process memory for tests
//! and for running the server without a database.

mod in_memory_store;

pub use in_memory_store::InMemoryPaymentStore;
