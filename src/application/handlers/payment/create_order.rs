//! CreateOrderHandler - Command handler for opening a payment order.
//!
//! Steps, each awaited in order:
//! 1. Validate the contact fields and amount (no external call on failure)
//! 2. Find or create the customer by email
//! 3. Open an order at the processor for the amount in minor units
//! 4. Record a pending payment row for the order
//!
//! A failure in steps 2-4 leaves earlier steps in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::foundation::{CustomerId, DomainError, OrderId, Timestamp};
use crate::domain::payment::{Amount, NewCustomer, OrderError, Payment};
use crate::ports::{CreateProcessorOrder, CustomerRepository, OrderGateway, PaymentRepository};

/// Command to create a payment order.
#[derive(Debug, Clone, Default)]
pub struct CreateOrderCommand {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Amount in major units; `None` when the client omitted it.
    pub amount: Option<i64>,
    pub description: Option<String>,
}

/// Result of a successfully created order.
#[derive(Debug, Clone)]
pub struct CreateOrderResult {
    pub order_id: OrderId,
    /// Amount in minor units, as echoed by the processor.
    pub amount: i64,
    pub currency: String,
    /// Public key id for the client-side checkout.
    pub key_id: String,
    /// Stored customer the order is linked to.
    pub customer_id: CustomerId,
    /// Contact details as submitted with this request.
    pub contact: NewCustomer,
}

/// Handler for creating payment orders.
pub struct CreateOrderHandler {
    customers: Arc<dyn CustomerRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn OrderGateway>,
    currency: String,
}

impl CreateOrderHandler {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn OrderGateway>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            customers,
            payments,
            gateway,
            currency: currency.into(),
        }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<CreateOrderResult, OrderError> {
        // 1. Validate everything before touching the store or the processor
        let contact = NewCustomer::new(cmd.name, cmd.email, cmd.phone)?;
        let amount = cmd
            .amount
            .ok_or_else(|| OrderError::validation("amount", "Field 'amount' is required"))?;
        let amount = Amount::new(amount)?;

        // 2. Find or create the customer
        let customer = self.customers.upsert_by_email(&contact).await?;

        // 3. Open the processor order
        let mut notes = BTreeMap::new();
        notes.insert("customer_id".to_string(), customer.id.to_string());
        notes.insert("customer_email".to_string(), customer.email.clone());

        let order = self
            .gateway
            .create_order(CreateProcessorOrder {
                amount: amount.minor_units(),
                currency: self.currency.clone(),
                receipt: format!("receipt_{}", Timestamp::now().as_unix_millis()),
                notes,
            })
            .await
            .map_err(|e| {
                let err = DomainError::from(e);
                tracing::warn!(
                    customer_id = %customer.id,
                    error_code = %err.code,
                    details = ?err.details,
                    "Processor order creation failed"
                );
                OrderError::from(err)
            })?;

        let order_id = OrderId::new(order.id.clone())
            .map_err(|_| OrderError::upstream("processor returned an empty order id"))?;

        // 4. Record the pending payment
        let payment = Payment::pending(
            order_id.clone(),
            customer.id,
            amount,
            self.currency.clone(),
            cmd.description,
        );
        self.payments.insert(&payment).await?;

        tracing::info!(
            order_id = %order_id,
            customer_id = %customer.id,
            amount = amount.major_units(),
            currency = %self.currency,
            "Payment order created"
        );

        Ok(CreateOrderResult {
            order_id,
            amount: order.amount,
            currency: order.currency,
            key_id: self.gateway.key_id().to_string(),
            customer_id: customer.id,
            contact,
        })
    }
}
