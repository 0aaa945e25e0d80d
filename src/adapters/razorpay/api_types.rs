//! Wire types for the Razorpay Orders API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct RazorpayOrderRequest {
    /// Amount in paise.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}

/// Order entity returned by Razorpay.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Error envelope Razorpay returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayErrorBody {
    pub error: RazorpayApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayApiError {
    /// e.g. `BAD_REQUEST_ERROR`, `SERVER_ERROR`.
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}
