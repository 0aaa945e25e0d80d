//! Request and response shapes for the payment endpoints.
//!
//! Field names follow what the checkout frontend already consumes: order
//! creation speaks camelCase, stored rows are returned in snake_case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::{CreateOrderCommand, CreateOrderResult};
use crate::domain::payment::{OrderError, Payment, PaymentStatus};
use crate::ports::{CustomerContact, PaymentSummary};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/create-order`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Amount as sent by browsers: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Whole(i64),
    Text(String),
    Other(serde_json::Value),
}

impl AmountInput {
    fn to_major_units(&self) -> Result<i64, OrderError> {
        match self {
            AmountInput::Whole(value) => Ok(*value),
            AmountInput::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                OrderError::validation("amount", "Field 'amount' must be a whole number")
            }),
            AmountInput::Other(_) => Err(OrderError::validation(
                "amount",
                "Field 'amount' must be a whole number",
            )),
        }
    }
}

impl CreateOrderRequest {
    /// Converts the loosely typed body into a command.
    pub fn into_command(self) -> Result<CreateOrderCommand, OrderError> {
        let amount = self
            .amount
            .as_ref()
            .map(AmountInput::to_major_units)
            .transpose()?;

        Ok(CreateOrderCommand {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            amount,
            description: self.description,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Response of `POST /api/create-order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    /// Minor units, as the checkout widget expects.
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

impl From<CreateOrderResult> for CreateOrderResponse {
    fn from(result: CreateOrderResult) -> Self {
        Self {
            success: true,
            order_id: result.order_id.to_string(),
            amount: result.amount,
            currency: result.currency,
            key_id: result.key_id,
            customer_name: result.contact.name().to_string(),
            customer_email: result.contact.email().to_string(),
            customer_phone: result.contact.phone().to_string(),
        }
    }
}

/// A stored payment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    /// Major units.
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_id: Option<String>,
    pub description: String,
    pub created_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            order_id: payment.order_id.to_string(),
            customer_id: payment.customer_id.to_string(),
            amount: payment.amount.major_units(),
            currency: payment.currency,
            status: payment.status,
            payment_id: payment.payment_id.map(|id| id.to_string()),
            description: payment.description,
            created_at: payment.created_at.to_rfc3339(),
        }
    }
}

/// Response of `GET /api/payment-status/:orderId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub success: bool,
    pub payment: PaymentResponse,
}

/// One entry of the payment listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentListItem {
    #[serde(flatten)]
    pub payment: PaymentResponse,
    pub customers: Option<CustomerContact>,
}

impl From<PaymentSummary> for PaymentListItem {
    fn from(summary: PaymentSummary) -> Self {
        Self {
            payment: summary.payment.into(),
            customers: summary.customer,
        }
    }
}

/// Response of `GET /api/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsResponse {
    pub success: bool,
    pub payments: Vec<PaymentListItem>,
}

/// Acknowledgement body for webhook deliveries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl WebhookAck {
    pub fn processed() -> Self {
        Self {
            success: true,
            message: "Webhook processed".to_string(),
            reference: None,
        }
    }

    pub fn invalid_signature() -> Self {
        Self {
            success: false,
            message: "Invalid signature".to_string(),
            reference: None,
        }
    }

    pub fn failed(reference: impl Into<String>) -> Self {
        Self {
            success: false,
            message: "Webhook could not be processed".to_string(),
            reference: Some(reference.into()),
        }
    }
}

/// Payload of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}

impl HealthResponse {
    pub fn running() -> Self {
        let endpoints = [
            ("POST /api/create-order", "Create payment order"),
            ("POST /webhook", "Razorpay webhook handler"),
            ("GET /api/payment-status/:orderId", "Check payment status"),
            ("GET /api/payments", "Get all payments"),
        ]
        .into_iter()
        .map(|(route, purpose)| (route.to_string(), purpose.to_string()))
        .collect();

        Self {
            message: "Razorpay Payment Gateway API is running".to_string(),
            endpoints,
        }
    }
}

/// Error body shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Correlation id of the server-side log entry, for internal failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: error_code.into(),
            message: message.into(),
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CustomerId, OrderId, ProcessorPaymentId};
    use crate::domain::payment::{Amount, NewCustomer, PaymentTransition};

    fn request(json: serde_json::Value) -> CreateOrderRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn numeric_string_amount_is_accepted() {
        let cmd = request(serde_json::json!({
            "name": "A", "email": "a@x.com", "phone": "1", "amount": " 499 "
        }))
        .into_command()
        .unwrap();

        assert_eq!(cmd.amount, Some(499));
    }

    #[test]
    fn fractional_amount_is_rejected() {
        let err = request(serde_json::json!({ "amount": 10.5 }))
            .into_command()
            .unwrap_err();

        assert!(matches!(err, OrderError::ValidationFailed { ref field, .. } if field == "amount"));
    }

    #[test]
    fn missing_fields_become_empty() {
        let cmd = request(serde_json::json!({})).into_command().unwrap();

        assert_eq!(cmd.name, "");
        assert_eq!(cmd.amount, None);
    }

    #[test]
    fn create_order_response_uses_camel_case() {
        let response = CreateOrderResponse::from(CreateOrderResult {
            order_id: OrderId::new("order_1").unwrap(),
            amount: 50_000,
            currency: "INR".to_string(),
            key_id: "rzp_test_1".to_string(),
            customer_id: CustomerId::new(),
            contact: NewCustomer::new("A", "a@x.com", "1").unwrap(),
        });

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["orderId"], "order_1");
        assert_eq!(json["keyId"], "rzp_test_1");
        assert_eq!(json["customerPhone"], "1");
        assert_eq!(json["amount"], 50_000);
    }

    #[test]
    fn payment_list_item_flattens_row_and_nests_customer() {
        let mut payment = Payment::pending(
            OrderId::new("order_1").unwrap(),
            CustomerId::new(),
            Amount::new(5).unwrap(),
            "INR",
            None,
        );
        payment.apply(&PaymentTransition::Succeed {
            payment_id: ProcessorPaymentId::new("pay_1").unwrap(),
        });
        let item = PaymentListItem::from(PaymentSummary {
            payment,
            customer: Some(CustomerContact {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
            }),
        });

        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["order_id"], "order_1");
        assert_eq!(json["status"], "success");
        assert_eq!(json["payment_id"], "pay_1");
        assert_eq!(json["customers"]["email"], "a@x.com");
    }

    #[test]
    fn webhook_ack_omits_empty_reference() {
        let json = serde_json::to_value(WebhookAck::processed()).unwrap();
        assert!(json.get("reference").is_none());
        assert_eq!(json["message"], "Webhook processed");
    }
}
