//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_order, get_payment_status, handle_razorpay_webhook, health, list_payments,
    PaymentAppState,
};

/// Create the payment API router.
///
/// # Routes
///
/// - `GET /` - Liveness banner
/// - `POST /api/create-order` - Create a processor order
/// - `GET /api/payment-status/:orderId` - Status of one payment
/// - `GET /api/payments` - All payments with customer contact
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhook` - Razorpay webhook deliveries
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new()
        .route("/", get(health))
        .route("/api/create-order", post(create_order))
        .route("/api/payment-status/:orderId", get(get_payment_status))
        .route("/api/payments", get(list_payments))
        .route("/webhook", post(handle_razorpay_webhook))
}
