//! Razorpay payment processor adapter.
//!
//! Implements the `OrderGateway` port against the Razorpay Orders API.
//! Webhook signatures are verified in the domain layer, not here.
//!
//! # Configuration
//!
//! Required settings (see `config::RazorpayConfig`):
//! - `PAYMENT_GATEWAY__RAZORPAY__KEY_ID`: public key id (`rzp_test_...` / `rzp_live_...`)
//! - `PAYMENT_GATEWAY__RAZORPAY__KEY_SECRET`: API secret used for basic auth

mod api_types;
mod mock_order_gateway;
mod razorpay_adapter;

pub use api_types::{RazorpayApiError, RazorpayErrorBody, RazorpayOrder, RazorpayOrderRequest};
pub use mock_order_gateway::MockOrderGateway;
pub use razorpay_adapter::{RazorpayGatewayConfig, RazorpayOrderGateway};
