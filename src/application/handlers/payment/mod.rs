//! Payment handlers.
//!
//! ## Commands
//! - Creating payment orders
//! - Reconciling Razorpay webhook deliveries
//!
//! ## Queries
//! - Payment status for one order
//! - Listing all payments

mod create_order;
mod get_payment_status;
mod list_payments;
mod reconcile_webhook;

// Commands
pub use create_order::{CreateOrderCommand, CreateOrderHandler, CreateOrderResult};
pub use reconcile_webhook::{ReconcileOutcome, ReconcileWebhookCommand, ReconcileWebhookHandler};

// Queries
pub use get_payment_status::{GetPaymentStatusHandler, GetPaymentStatusQuery};
pub use list_payments::ListPaymentsHandler;
