//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod payment;

pub use payment::{
    CreateOrderCommand, CreateOrderHandler, CreateOrderResult, GetPaymentStatusHandler,
    GetPaymentStatusQuery, ListPaymentsHandler, ReconcileOutcome, ReconcileWebhookCommand,
    ReconcileWebhookHandler,
};
