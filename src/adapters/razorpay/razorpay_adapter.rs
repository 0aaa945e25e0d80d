//! Razorpay order gateway adapter.
//!
//! ```ignore
//! let config = RazorpayGatewayConfig::new(key_id, key_secret);
//! let gateway = RazorpayOrderGateway::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    CreateProcessorOrder, OrderGateway, PaymentError, PaymentErrorCode, ProcessorOrder,
};

use super::api_types::{RazorpayErrorBody, RazorpayOrder, RazorpayOrderRequest};

/// Default Razorpay API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API credentials and endpoint.
#[derive(Clone)]
pub struct RazorpayGatewayConfig {
    /// Public key id, sent to the browser checkout.
    key_id: String,

    /// API secret, used only for basic auth.
    key_secret: SecretString,

    /// Base URL for the Razorpay API.
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl RazorpayGatewayConfig {
    /// Create a new Razorpay configuration.
    pub fn new(key_id: impl Into<String>, key_secret: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Razorpay implementation of `OrderGateway`.
pub struct RazorpayOrderGateway {
    config: RazorpayGatewayConfig,
    http_client: reqwest::Client,
}

impl RazorpayOrderGateway {
    /// Create a new Razorpay gateway with the given configuration.
    pub fn new(config: RazorpayGatewayConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl OrderGateway for RazorpayOrderGateway {
    async fn create_order(
        &self,
        request: CreateProcessorOrder,
    ) -> Result<ProcessorOrder, PaymentError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);

        let body = RazorpayOrderRequest {
            amount: request.amount,
            currency: request.currency,
            receipt: request.receipt,
            notes: request.notes,
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                error = %error_text,
                "Razorpay create_order failed"
            );
            return Err(error_from_response(status, &error_text));
        }

        let order: RazorpayOrder = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Razorpay response: {}", e))
        })?;

        tracing::debug!(order_id = %order.id, amount = order.amount, "Razorpay order created");

        Ok(ProcessorOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
        })
    }

    fn key_id(&self) -> &str {
        &self.config.key_id
    }
}

/// Maps a non-2xx Razorpay response to a payment error.
fn error_from_response(status: StatusCode, body: &str) -> PaymentError {
    let code = match status {
        StatusCode::UNAUTHORIZED => PaymentErrorCode::AuthenticationError,
        StatusCode::TOO_MANY_REQUESTS => PaymentErrorCode::RateLimitExceeded,
        s if s.is_client_error() => PaymentErrorCode::BadRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    match serde_json::from_str::<RazorpayErrorBody>(body) {
        Ok(parsed) => {
            let message = parsed
                .error
                .description
                .unwrap_or_else(|| format!("Razorpay API error ({})", status.as_u16()));
            PaymentError::new(code, message).with_provider_code(parsed.error.code)
        }
        Err(_) => PaymentError::new(code, format!("Razorpay API error: {}", body)),
    }
}
