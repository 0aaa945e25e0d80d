//! Payment domain module.
//!
//! Order-to-settlement lifecycle and Razorpay webhook handling.
//!
//! # Module Structure
//!
//! - `aggregate` - Payment aggregate, amount and transitions
//! - `customer` - Customer identity record
//! - `status` - PaymentStatus state machine
//! - `razorpay_event` - Webhook event payloads
//! - `webhook_verifier` - HMAC-SHA256 signature verification

mod aggregate;
mod customer;
mod errors;
mod razorpay_event;
mod status;
mod webhook_errors;
mod webhook_verifier;

pub use aggregate::{
    Amount, Payment, PaymentTransition, TransitionDecision, DEFAULT_DESCRIPTION,
    MINOR_UNITS_PER_MAJOR,
};
pub use customer::{Customer, NewCustomer};
pub use errors::OrderError;
pub use razorpay_event::{
    EntityWrapper, EventPayload, PaymentEntity, RazorpayEvent, WebhookEventKind,
};
pub use status::PaymentStatus;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{WebhookVerifier, SIGNATURE_HEADER};
