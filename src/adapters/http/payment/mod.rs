//! HTTP adapter for payment endpoints.
//!
//! Exposes the payment flow via REST API:
//! - `GET /` - Liveness banner
//! - `POST /api/create-order` - Create a Razorpay order and a pending payment
//! - `POST /webhook` - Reconcile Razorpay webhook deliveries
//! - `GET /api/payment-status/:orderId` - Status of one payment
//! - `GET /api/payments` - All payments with customer contact

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{PaymentApiError, PaymentAppState};
pub use routes::payment_router;
