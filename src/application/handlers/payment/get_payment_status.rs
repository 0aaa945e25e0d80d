//! GetPaymentStatusHandler - Query handler for a single order's payment.

use std::sync::Arc;

use crate::domain::foundation::OrderId;
use crate::domain::payment::{OrderError, Payment};
use crate::ports::PaymentRepository;

/// Query for the payment recorded against an order.
#[derive(Debug, Clone)]
pub struct GetPaymentStatusQuery {
    pub order_id: OrderId,
}

/// Handler for payment status lookups.
pub struct GetPaymentStatusHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl GetPaymentStatusHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, query: GetPaymentStatusQuery) -> Result<Payment, OrderError> {
        self.payments
            .find_by_order_id(&query.order_id)
            .await?
            .ok_or(OrderError::NotFound(query.order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPaymentStore;
    use crate::domain::foundation::CustomerId;
    use crate::domain::payment::{Amount, PaymentStatus};

    #[tokio::test]
    async fn returns_recorded_payment() {
        let store = Arc::new(InMemoryPaymentStore::new());
        let order_id = OrderId::new("order_lookup").unwrap();
        store
            .insert(&Payment::pending(
                order_id.clone(),
                CustomerId::new(),
                Amount::new(10).unwrap(),
                "INR",
                None,
            ))
            .await
            .unwrap();

        let payment = GetPaymentStatusHandler::new(store)
            .handle(GetPaymentStatusQuery { order_id })
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let handler = GetPaymentStatusHandler::new(Arc::new(InMemoryPaymentStore::new()));

        let err = handler
            .handle(GetPaymentStatusQuery {
                order_id: OrderId::new("order_missing").unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::NotFound(_)));
    }
}
