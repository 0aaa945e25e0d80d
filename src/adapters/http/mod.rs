//! HTTP adapters - REST API implementations.

pub mod payment;
pub mod server;

pub use payment::{payment_router, PaymentAppState};
pub use server::{build_app, cors_layer};
