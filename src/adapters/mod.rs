//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-process store for tests and database-less runs
//! - `postgres` - PostgreSQL persistence
//! - `razorpay` - Razorpay Orders API gateway
//! - `http` - Axum REST API
//! - `client` - HTTP client for the payment status endpoint

pub mod client;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod razorpay;
