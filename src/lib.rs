//! Payment Gateway - Razorpay order creation and webhook reconciliation
//!
//! This crate creates Razorpay orders for checkout, records each order as a
//! pending payment, settles payments from signed webhook deliveries and
//! serves their status to the browser.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
