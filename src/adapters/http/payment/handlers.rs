//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::{
    CreateOrderHandler, GetPaymentStatusHandler, GetPaymentStatusQuery, ListPaymentsHandler,
    ReconcileWebhookCommand, ReconcileWebhookHandler,
};
use crate::domain::foundation::{OrderId, ValidationError};
use crate::domain::payment::{OrderError, WebhookVerifier, SIGNATURE_HEADER};
use crate::ports::{CustomerRepository, OrderGateway, PaymentReader, PaymentRepository};

use super::dto::{
    CreateOrderRequest, CreateOrderResponse, ErrorResponse, HealthResponse, PaymentListItem,
    PaymentResponse, PaymentStatusResponse, PaymentsResponse, WebhookAck,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct PaymentAppState {
    pub customer_repository: Arc<dyn CustomerRepository>,
    pub payment_repository: Arc<dyn PaymentRepository>,
    pub payment_reader: Arc<dyn PaymentReader>,
    pub order_gateway: Arc<dyn OrderGateway>,
    pub webhook_verifier: WebhookVerifier,
    /// ISO currency code orders are created in.
    pub currency: String,
}

impl PaymentAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(
            self.customer_repository.clone(),
            self.payment_repository.clone(),
            self.order_gateway.clone(),
            self.currency.clone(),
        )
    }

    pub fn reconcile_webhook_handler(&self) -> ReconcileWebhookHandler {
        ReconcileWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.payment_repository.clone(),
        )
    }

    pub fn payment_status_handler(&self) -> GetPaymentStatusHandler {
        GetPaymentStatusHandler::new(self.payment_repository.clone())
    }

    pub fn list_payments_handler(&self) -> ListPaymentsHandler {
        ListPaymentsHandler::new(self.payment_reader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/create-order - Create a processor order and a pending payment
pub async fn create_order(
    State(state): State<PaymentAppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let Json(request) =
        body.map_err(|rejection| OrderError::validation("body", rejection.body_text()))?;

    let cmd = request.into_command()?;
    let result = state.create_order_handler().handle(cmd).await?;

    Ok(Json(CreateOrderResponse::from(result)))
}

/// POST /webhook - Reconcile a Razorpay webhook delivery
///
/// Answers 400 only when the delivery cannot be authenticated. Anything that
/// goes wrong afterwards is logged and acknowledged with 200 so Razorpay does
/// not redeliver.
pub async fn handle_razorpay_webhook(
    State(state): State<PaymentAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let cmd = ReconcileWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    match state.reconcile_webhook_handler().handle(cmd).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Webhook reconciled");
            (StatusCode::OK, Json(WebhookAck::processed()))
        }
        Err(err) if err.is_authenticity_failure() => {
            tracing::warn!(error = %err, "Rejected webhook with invalid signature");
            (err.status_code(), Json(WebhookAck::invalid_signature()))
        }
        Err(err) => {
            let reference = Uuid::new_v4().to_string();
            tracing::error!(error = %err, reference = %reference, "Webhook processing failed");
            (err.status_code(), Json(WebhookAck::failed(reference)))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/payment-status/:orderId - Current status of one payment
pub async fn get_payment_status(
    State(state): State<PaymentAppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let order_id = OrderId::new(order_id)?;
    let payment = state
        .payment_status_handler()
        .handle(GetPaymentStatusQuery { order_id })
        .await?;

    Ok(Json(PaymentStatusResponse {
        success: true,
        payment: PaymentResponse::from(payment),
    }))
}

/// GET /api/payments - All payments with customer contact, newest first
pub async fn list_payments(
    State(state): State<PaymentAppState>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let payments = state.list_payments_handler().handle().await?;

    Ok(Json(PaymentsResponse {
        success: true,
        payments: payments.into_iter().map(PaymentListItem::from).collect(),
    }))
}

/// GET / - Liveness banner listing the endpoints
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::running())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for converting order errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(OrderError);

impl From<OrderError> for PaymentApiError {
    fn from(err: OrderError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for PaymentApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let error_code = self.0.code().to_string();

        let (status, body) = match &self.0 {
            OrderError::ValidationFailed { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(error_code, self.0.message()),
            ),
            OrderError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(error_code, "Payment not found"),
            ),
            OrderError::Upstream(_) | OrderError::Infrastructure(_) => {
                let reference = Uuid::new_v4().to_string();
                tracing::error!(
                    error = %self.0.message(),
                    reference = %reference,
                    "Request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(error_code, "Something went wrong, please try again")
                        .with_reference(reference),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // PaymentApiError
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn api_error_maps_validation_to_400_with_message() {
        let err = PaymentApiError(OrderError::validation("amount", "Field 'amount' is required"));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error_code"], "VALIDATION_FAILED");
        assert!(json["message"].as_str().unwrap().contains("amount"));
        assert!(json.get("reference").is_none());
    }

    #[tokio::test]
    async fn api_error_maps_not_found_to_404() {
        let err = PaymentApiError(OrderError::not_found(OrderId::new("order_x").unwrap()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Payment not found");
    }

    #[tokio::test]
    async fn api_error_hides_upstream_detail_behind_reference() {
        let err = PaymentApiError(OrderError::upstream("Authentication failed: key rzp_live_x"));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        let message = json["message"].as_str().unwrap();
        assert!(!message.contains("rzp_live_x"));
        let reference = json["reference"].as_str().unwrap();
        assert!(Uuid::parse_str(reference).is_ok());
    }

    #[tokio::test]
    async fn api_error_maps_infrastructure_to_500() {
        let err = PaymentApiError(OrderError::infrastructure("connection refused"));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error_code"], "DATABASE_ERROR");
        assert!(!json["message"].as_str().unwrap().contains("refused"));
    }
}
