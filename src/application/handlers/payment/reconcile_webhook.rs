//! ReconcileWebhookHandler - Command handler for Razorpay webhook deliveries.
//!
//! Verifies the signature over the raw body, then moves the payment for the
//! referenced order forward. Status only ever moves `pending -> success` or
//! `pending -> failed`; everything else is a no-op that is still
//! acknowledged.

use std::sync::Arc;

use crate::domain::foundation::OrderId;
use crate::domain::payment::{
    PaymentStatus, PaymentTransition, TransitionDecision, WebhookError, WebhookVerifier,
};
use crate::ports::PaymentRepository;

/// Command to reconcile a webhook delivery.
#[derive(Debug, Clone)]
pub struct ReconcileWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the `x-razorpay-signature` header.
    pub signature: String,
}

/// What a verified delivery did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The payment left `pending`.
    Transitioned {
        order_id: OrderId,
        status: PaymentStatus,
    },
    /// The payment already reflected this event.
    AlreadyApplied {
        order_id: OrderId,
        status: PaymentStatus,
    },
    /// The payment is in a different terminal state; the event was dropped.
    IgnoredTerminal {
        order_id: OrderId,
        current: PaymentStatus,
        requested: PaymentStatus,
    },
    /// The event kind does not affect payments.
    IgnoredUnknownEvent { event: String },
    /// No payment exists for the referenced order.
    UnknownOrder { order_id: OrderId },
}

/// Handler for Razorpay webhook deliveries.
pub struct ReconcileWebhookHandler {
    verifier: WebhookVerifier,
    payments: Arc<dyn PaymentRepository>,
}

impl ReconcileWebhookHandler {
    pub fn new(verifier: WebhookVerifier, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { verifier, payments }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileWebhookCommand,
    ) -> Result<ReconcileOutcome, WebhookError> {
        // 1. Verify signature and parse event
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &cmd.signature)?;

        tracing::info!(event = %event.event, "Webhook event received");

        // 2. Resolve the requested transition
        let Some((order_id, transition)) = event.transition()? else {
            tracing::debug!(event = %event.event, "Ignoring webhook event kind");
            return Ok(ReconcileOutcome::IgnoredUnknownEvent { event: event.event });
        };

        // 3. Conditional update, then classify when nothing changed
        if self.try_transition(&order_id, &transition).await? {
            return Ok(self.transitioned(order_id, &transition));
        }

        let payment = self
            .payments
            .find_by_order_id(&order_id)
            .await
            .map_err(|e| WebhookError::Database(e.to_string()))?;

        let Some(payment) = payment else {
            tracing::warn!(order_id = %order_id, event = %event.event, "Webhook for unknown order");
            return Ok(ReconcileOutcome::UnknownOrder { order_id });
        };

        match payment.decide(&transition) {
            TransitionDecision::AlreadyApplied => {
                tracing::debug!(
                    order_id = %order_id,
                    status = %payment.status,
                    "Webhook already applied"
                );
                Ok(ReconcileOutcome::AlreadyApplied {
                    order_id,
                    status: payment.status,
                })
            }
            TransitionDecision::Reject { current } => {
                tracing::warn!(
                    order_id = %order_id,
                    current = %current,
                    requested = %transition.target(),
                    event = %event.event,
                    "Ignoring webhook that would override a terminal payment"
                );
                Ok(ReconcileOutcome::IgnoredTerminal {
                    order_id,
                    current,
                    requested: transition.target(),
                })
            }
            TransitionDecision::Apply => {
                // Row was inserted between the update and the reload.
                if self.try_transition(&order_id, &transition).await? {
                    Ok(self.transitioned(order_id, &transition))
                } else {
                    Err(WebhookError::Database(format!(
                        "payment for {} changed concurrently",
                        order_id
                    )))
                }
            }
        }
    }

    async fn try_transition(
        &self,
        order_id: &OrderId,
        transition: &PaymentTransition,
    ) -> Result<bool, WebhookError> {
        self.payments
            .transition_if_pending(order_id, transition)
            .await
            .map_err(|e| WebhookError::Database(e.to_string()))
    }

    fn transitioned(&self, order_id: OrderId, transition: &PaymentTransition) -> ReconcileOutcome {
        let status = transition.target();
        match transition.payment_id() {
            Some(payment_id) => tracing::info!(
                order_id = %order_id,
                payment_id = %payment_id,
                status = %status,
                "Payment settled"
            ),
            None => tracing::info!(order_id = %order_id, status = %status, "Payment failed"),
        }
        ReconcileOutcome::Transitioned { order_id, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPaymentStore;
    use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};
    use crate::domain::payment::{Amount, Payment};
    use async_trait::async_trait;

    const SECRET: &str = "whsec_test_reconcile";

    fn payment_event(event: &str, order_id: &str, payment_id: &str) -> Vec<u8> {
        serde_json::json!({
            "entity": "event",
            "event": event,
            "payload": {
                "payment": {
                    "entity": {
                        "id": payment_id,
                        "order_id": order_id,
                        "amount": 50000,
                        "currency": "INR",
                        "status": "captured"
                    }
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    fn signed(payload: Vec<u8>) -> ReconcileWebhookCommand {
        let signature = WebhookVerifier::new(SECRET)
            .compute_signature(&payload)
            .unwrap();
        ReconcileWebhookCommand { payload, signature }
    }

    async fn store_with_pending(order_id: &str) -> Arc<InMemoryPaymentStore> {
        let store = Arc::new(InMemoryPaymentStore::new());
        store
            .insert(&Payment::pending(
                OrderId::new(order_id).unwrap(),
                CustomerId::new(),
                Amount::new(500).unwrap(),
                "INR",
                None,
            ))
            .await
            .unwrap();
        store
    }

    fn handler(store: Arc<InMemoryPaymentStore>) -> ReconcileWebhookHandler {
        ReconcileWebhookHandler::new(WebhookVerifier::new(SECRET), store)
    }

    async fn status_of(store: &InMemoryPaymentStore, order_id: &str) -> Payment {
        store
            .find_by_order_id(&OrderId::new(order_id).unwrap())
            .await
            .unwrap()
            .unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Forward Transitions
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn captured_moves_pending_to_success() {
        let store = store_with_pending("order_1").await;
        let handler = handler(store.clone());

        let outcome = handler
            .handle(signed(payment_event("payment.captured", "order_1", "pay_1")))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            ReconcileOutcome::Transitioned {
                status: PaymentStatus::Success,
                ..
            }
        ));
        let payment = status_of(&store, "order_1").await;
        assert_eq!(payment.status, PaymentStatus::Success);
        assert_eq!(payment.payment_id.unwrap().as_str(), "pay_1");
    }

    #[tokio::test]
    async fn authorized_moves_pending_to_success() {
        let store = store_with_pending("order_1").await;

        handler(store.clone())
            .handle(signed(payment_event("payment.authorized", "order_1", "pay_1")))
            .await
            .unwrap();

        assert_eq!(status_of(&store, "order_1").await.status, PaymentStatus::Success);
    }

    #[tokio::test]
    async fn failed_moves_pending_to_failed() {
        let store = store_with_pending("order_1").await;

        handler(store.clone())
            .handle(signed(payment_event("payment.failed", "order_1", "pay_1")))
            .await
            .unwrap();

        let payment = status_of(&store, "order_1").await;
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert!(payment.payment_id.is_none());
    }

    // ══════════════════════════════════════════════════════════════
    // Idempotence and Terminal States
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn captured_twice_is_idempotent() {
        let store = store_with_pending("order_1").await;
        let handler = handler(store.clone());
        let cmd = signed(payment_event("payment.captured", "order_1", "pay_1"));

        handler.handle(cmd.clone()).await.unwrap();
        let after_first = status_of(&store, "order_1").await;
        let outcome = handler.handle(cmd).await.unwrap();

        assert!(matches!(outcome, ReconcileOutcome::AlreadyApplied { .. }));
        assert_eq!(status_of(&store, "order_1").await, after_first);
    }

    #[tokio::test]
    async fn failed_after_success_is_ignored() {
        let store = store_with_pending("order_1").await;
        let handler = handler(store.clone());
        handler
            .handle(signed(payment_event("payment.captured", "order_1", "pay_1")))
            .await
            .unwrap();

        let outcome = handler
            .handle(signed(payment_event("payment.failed", "order_1", "pay_1")))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            ReconcileOutcome::IgnoredTerminal {
                current: PaymentStatus::Success,
                requested: PaymentStatus::Failed,
                ..
            }
        ));
        let payment = status_of(&store, "order_1").await;
        assert_eq!(payment.status, PaymentStatus::Success);
        assert_eq!(payment.payment_id.unwrap().as_str(), "pay_1");
    }

    #[tokio::test]
    async fn success_after_failed_is_ignored() {
        let store = store_with_pending("order_1").await;
        let handler = handler(store.clone());
        handler
            .handle(signed(payment_event("payment.failed", "order_1", "pay_1")))
            .await
            .unwrap();

        handler
            .handle(signed(payment_event("payment.captured", "order_1", "pay_2")))
            .await
            .unwrap();

        assert_eq!(status_of(&store, "order_1").await.status, PaymentStatus::Failed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_captured_and_failed_settle_exactly_once() {
        for round in 0..25 {
            let order_id = format!("order_race_{}", round);
            let store = store_with_pending(&order_id).await;
            let handler = Arc::new(handler(store.clone()));

            let captured = {
                let handler = handler.clone();
                let cmd = signed(payment_event("payment.captured", &order_id, "pay_race"));
                tokio::spawn(async move { handler.handle(cmd).await })
            };
            let failed = {
                let handler = handler.clone();
                let cmd = signed(payment_event("payment.failed", &order_id, "pay_race"));
                tokio::spawn(async move { handler.handle(cmd).await })
            };

            let outcomes = [
                captured.await.unwrap().unwrap(),
                failed.await.unwrap().unwrap(),
            ];

            let winners: Vec<PaymentStatus> = outcomes
                .iter()
                .filter_map(|o| match o {
                    ReconcileOutcome::Transitioned { status, .. } => Some(*status),
                    _ => None,
                })
                .collect();
            assert_eq!(winners.len(), 1, "round {}: {:?}", round, outcomes);

            let winner = winners[0];
            assert!(outcomes.iter().any(|o| matches!(
                o,
                ReconcileOutcome::IgnoredTerminal { current, requested, .. }
                    if *current == winner && *requested != winner
            )));
            assert_eq!(status_of(&store, &order_id).await.status, winner);
        }
    }

    #[tokio::test]
    async fn unknown_event_is_ignored() {
        let store = store_with_pending("order_1").await;

        let outcome = handler(store.clone())
            .handle(signed(payment_event("refund.processed", "order_1", "pay_1")))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::IgnoredUnknownEvent {
                event: "refund.processed".to_string()
            }
        );
        assert_eq!(status_of(&store, "order_1").await.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_order_is_acknowledged() {
        let store = store_with_pending("order_1").await;

        let outcome = handler(store)
            .handle(signed(payment_event("payment.captured", "order_ghost", "pay_1")))
            .await
            .unwrap();

        assert!(matches!(outcome, ReconcileOutcome::UnknownOrder { .. }));
    }

    // ══════════════════════════════════════════════════════════════
    // Rejections
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn bad_signature_touches_nothing() {
        let store = store_with_pending("order_1").await;
        let mut cmd = signed(payment_event("payment.captured", "order_1", "pay_1"));
        cmd.signature = WebhookVerifier::new("wrong_secret")
            .compute_signature(&cmd.payload)
            .unwrap();

        let err = handler(store.clone()).handle(cmd).await.unwrap_err();

        assert!(err.is_authenticity_failure());
        assert_eq!(status_of(&store, "order_1").await.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn signed_garbage_is_a_parse_error() {
        let store = store_with_pending("order_1").await;

        let err = handler(store)
            .handle(signed(b"{not json".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::ParseError(_)));
        assert!(!err.is_authenticity_failure());
    }

    struct FailingRepository;

    #[async_trait]
    impl PaymentRepository for FailingRepository {
        async fn insert(&self, _payment: &Payment) -> Result<(), DomainError> {
            Ok(())
        }

        async fn find_by_order_id(
            &self,
            _order_id: &OrderId,
        ) -> Result<Option<Payment>, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "connection refused"))
        }

        async fn transition_if_pending(
            &self,
            _order_id: &OrderId,
            _transition: &PaymentTransition,
        ) -> Result<bool, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "connection refused"))
        }
    }

    #[tokio::test]
    async fn store_failure_is_a_database_error() {
        let handler = ReconcileWebhookHandler::new(
            WebhookVerifier::new(SECRET),
            Arc::new(FailingRepository),
        );

        let err = handler
            .handle(signed(payment_event("payment.captured", "order_1", "pay_1")))
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::Database(_)));
    }
}
