//! Razorpay webhook event types.
//!
//! Only the fields the reconciler needs are modelled; everything else in the
//! payload is tolerated and ignored.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrderId, ProcessorPaymentId};

use super::webhook_errors::WebhookError;
use super::PaymentTransition;

/// A webhook delivery from Razorpay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayEvent {
    /// Event name, e.g. `payment.captured`.
    pub event: String,

    /// Razorpay account the event belongs to.
    #[serde(default)]
    pub account_id: Option<String>,

    /// Entities carried by the event.
    #[serde(default)]
    pub payload: EventPayload,

    /// Unix timestamp when the event was created.
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Entities attached to an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub payment: Option<EntityWrapper<PaymentEntity>>,
}

/// Razorpay wraps every entity in `{ "entity": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

/// The payment entity inside `payload.payment.entity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntity {
    /// Settlement id (`pay_...`).
    pub id: String,

    /// Order the payment belongs to (`order_...`).
    #[serde(default)]
    pub order_id: Option<String>,

    /// Amount in minor units.
    #[serde(default)]
    pub amount: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,

    /// Processor-side status (`authorized`, `captured`, `failed`).
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub error_description: Option<String>,
}

/// Event kinds the reconciler distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    PaymentAuthorized,
    PaymentCaptured,
    PaymentFailed,
    Unknown(String),
}

impl WebhookEventKind {
    /// Returns true for kinds that settle a payment.
    pub fn is_settlement(&self) -> bool {
        matches!(
            self,
            WebhookEventKind::PaymentAuthorized | WebhookEventKind::PaymentCaptured
        )
    }
}

impl RazorpayEvent {
    /// Parses the event name into a known kind.
    pub fn kind(&self) -> WebhookEventKind {
        match self.event.as_str() {
            "payment.authorized" => WebhookEventKind::PaymentAuthorized,
            "payment.captured" => WebhookEventKind::PaymentCaptured,
            "payment.failed" => WebhookEventKind::PaymentFailed,
            other => WebhookEventKind::Unknown(other.to_string()),
        }
    }

    /// Returns the payment entity, if the event carries one.
    pub fn payment_entity(&self) -> Option<&PaymentEntity> {
        self.payload.payment.as_ref().map(|p| &p.entity)
    }

    /// Converts a payment event into the order it targets and the transition
    /// it requests.
    ///
    /// Returns `Ok(None)` for event kinds that do not affect payment state.
    pub fn transition(&self) -> Result<Option<(OrderId, PaymentTransition)>, WebhookError> {
        let kind = self.kind();
        if matches!(kind, WebhookEventKind::Unknown(_)) {
            return Ok(None);
        }

        let entity = self
            .payment_entity()
            .ok_or(WebhookError::MissingField("payload.payment.entity"))?;

        let order_id = entity
            .order_id
            .as_deref()
            .ok_or(WebhookError::MissingField("payload.payment.entity.order_id"))
            .and_then(|id| {
                OrderId::new(id).map_err(|_| WebhookError::MissingField("order_id"))
            })?;

        let transition = if kind.is_settlement() {
            let payment_id = ProcessorPaymentId::new(entity.id.clone())
                .map_err(|_| WebhookError::MissingField("payload.payment.entity.id"))?;
            PaymentTransition::Succeed { payment_id }
        } else {
            PaymentTransition::Fail
        };

        Ok(Some((order_id, transition)))
    }
}
