//! In-memory implementation of the customer and payment ports.
//!
//! A single lock guards both tables, so the email upsert and the
//! pending-only transition are atomic exactly like their SQL counterparts.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, OrderId};
use crate::domain::payment::{
    Customer, NewCustomer, Payment, PaymentTransition, TransitionDecision,
};
use crate::ports::{
    CustomerContact, CustomerRepository, PaymentReader, PaymentRepository, PaymentSummary,
};

/// Process-local store for customers and payments.
#[derive(Default)]
pub struct InMemoryPaymentStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    /// Customers keyed by email.
    customers: HashMap<String, Customer>,

    /// Payments keyed by processor order id.
    payments: HashMap<String, Payment>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub async fn customer_count(&self) -> usize {
        self.tables.read().await.customers.len()
    }

    /// Number of stored payments.
    pub async fn payment_count(&self) -> usize {
        self.tables.read().await.payments.len()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryPaymentStore {
    async fn upsert_by_email(&self, customer: &NewCustomer) -> Result<Customer, DomainError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .customers
            .entry(customer.email().to_string())
            .or_insert_with(|| customer.clone().into_customer(CustomerId::new()));
        Ok(row.clone())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentStore {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let key = payment.order_id.as_str().to_string();
        if tables.payments.contains_key(&key) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Payment for order {} already exists", key),
            ));
        }
        tables.payments.insert(key, payment.clone());
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.payments.get(order_id.as_str()).cloned())
    }

    async fn transition_if_pending(
        &self,
        order_id: &OrderId,
        transition: &PaymentTransition,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        match tables.payments.get_mut(order_id.as_str()) {
            Some(payment) => Ok(payment.apply(transition) == TransitionDecision::Apply),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PaymentReader for InMemoryPaymentStore {
    async fn list_with_customers(&self) -> Result<Vec<PaymentSummary>, DomainError> {
        let tables = self.tables.read().await;
        let mut summaries: Vec<PaymentSummary> = tables
            .payments
            .values()
            .map(|payment| PaymentSummary {
                payment: payment.clone(),
                customer: tables
                    .customers
                    .values()
                    .find(|c| c.id == payment.customer_id)
                    .map(|c| CustomerContact {
                        name: c.name.clone(),
                        email: c.email.clone(),
                    }),
            })
            .collect();

        summaries.sort_by(|a, b| b.payment.created_at.cmp(&a.payment.created_at));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ProcessorPaymentId, Timestamp};
    use crate::domain::payment::{Amount, PaymentStatus};
    use chrono::Duration;
    use std::sync::Arc;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer::new("Asha", email, "9999999999").unwrap()
    }

    fn pending(order: &str, customer_id: CustomerId) -> Payment {
        Payment::pending(
            OrderId::new(order).unwrap(),
            customer_id,
            Amount::new(250).unwrap(),
            "INR",
            None,
        )
    }

    fn captured(id: &str) -> PaymentTransition {
        PaymentTransition::Succeed {
            payment_id: ProcessorPaymentId::new(id).unwrap(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Customers
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn upsert_reuses_existing_customer() {
        let store = InMemoryPaymentStore::new();

        let first = store.upsert_by_email(&new_customer("a@x.com")).await.unwrap();
        let second = store
            .upsert_by_email(&NewCustomer::new("Other Name", "a@x.com", "1").unwrap())
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Asha");
        assert_eq!(store.customer_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_upserts_create_one_customer() {
        let store = Arc::new(InMemoryPaymentStore::new());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.upsert_by_email(&new_customer("race@x.com")).await.unwrap()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().id);
        }

        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.customer_count().await, 1);
    }

    // ══════════════════════════════════════════════════════════════
    // Payments
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn duplicate_order_is_a_conflict() {
        let store = InMemoryPaymentStore::new();
        let payment = pending("order_dup", CustomerId::new());
        store.insert(&payment).await.unwrap();

        let err = store.insert(&payment).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn transition_applies_only_once() {
        let store = InMemoryPaymentStore::new();
        let order_id = OrderId::new("order_once").unwrap();
        store.insert(&pending("order_once", CustomerId::new())).await.unwrap();

        assert!(store.transition_if_pending(&order_id, &captured("pay_1")).await.unwrap());
        assert!(!store.transition_if_pending(&order_id, &captured("pay_1")).await.unwrap());
        assert!(!store
            .transition_if_pending(&order_id, &PaymentTransition::Fail)
            .await
            .unwrap());

        let payment = store.find_by_order_id(&order_id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Success);
        assert_eq!(payment.payment_id.unwrap().as_str(), "pay_1");
    }

    #[tokio::test]
    async fn transition_on_unknown_order_changes_nothing() {
        let store = InMemoryPaymentStore::new();

        let changed = store
            .transition_if_pending(&OrderId::new("order_ghost").unwrap(), &PaymentTransition::Fail)
            .await
            .unwrap();

        assert!(!changed);
        assert_eq!(store.payment_count().await, 0);
    }

    #[tokio::test]
    async fn list_is_newest_first_with_customer() {
        let store = InMemoryPaymentStore::new();
        let customer = store.upsert_by_email(&new_customer("c@x.com")).await.unwrap();

        let mut older = pending("order_old", customer.id);
        older.created_at =
            Timestamp::from_datetime(*older.created_at.as_datetime() - Duration::minutes(5));
        store.insert(&older).await.unwrap();
        store.insert(&pending("order_new", customer.id)).await.unwrap();

        let list = store.list_with_customers().await.unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].payment.order_id.as_str(), "order_new");
        assert_eq!(list[1].payment.order_id.as_str(), "order_old");
        assert_eq!(list[0].customer.as_ref().unwrap().email, "c@x.com");
    }
}
