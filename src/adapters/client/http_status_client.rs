//! HTTP implementation of PaymentStatusSource.
//!
//! Queries `GET /api/payment-status/:orderId` on a running server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::domain::foundation::OrderId;
use crate::domain::payment::PaymentStatus;
use crate::ports::{PaymentStatusSource, StatusQueryError};

/// Status client for the payment API.
pub struct HttpPaymentStatusClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpPaymentStatusClient {
    /// Creates a client for the API at `base_url`.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, StatusQueryError> {
        let base_url = Url::parse(base_url.as_ref()).map_err(|e| {
            StatusQueryError::Configuration(format!("invalid API url '{}': {}", base_url.as_ref(), e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StatusQueryError::Configuration(format!(
                "API url '{}' cannot carry a path",
                base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatusQueryError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// The order id is pushed as a single encoded path segment.
    fn status_url(&self, order_id: &OrderId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "payment-status", order_id.as_str()]);
        }
        url
    }
}

/// The subset of the status response the client reads.
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    payment: Option<StatusPayment>,
}

#[derive(Debug, Deserialize)]
struct StatusPayment {
    status: PaymentStatus,
}

fn interpret(status: StatusCode, body: &str) -> Result<PaymentStatus, StatusQueryError> {
    if status == StatusCode::NOT_FOUND {
        return Err(StatusQueryError::NotFound);
    }

    let envelope: StatusEnvelope = serde_json::from_str(body).map_err(|e| {
        StatusQueryError::Transport(format!("unexpected response ({}): {}", status, e))
    })?;

    match envelope {
        StatusEnvelope {
            success: true,
            payment: Some(payment),
            ..
        } => Ok(payment.status),
        StatusEnvelope { message, .. } => Err(StatusQueryError::Rejected(
            message.unwrap_or_else(|| format!("server answered {}", status)),
        )),
    }
}

#[async_trait]
impl PaymentStatusSource for HttpPaymentStatusClient {
    async fn fetch_status(&self, order_id: &OrderId) -> Result<PaymentStatus, StatusQueryError> {
        let response = self
            .http_client
            .get(self.status_url(order_id))
            .send()
            .await
            .map_err(|e| StatusQueryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StatusQueryError::Transport(e.to_string()))?;

        interpret(status, &body)
    }
}
