//! Mock order gateway for testing.
//!
//! Supports:
//! - Deterministic order ids (`order_mock_1`, `order_mock_2`, ...)
//! - Error injection
//! - Call tracking

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateProcessorOrder, OrderGateway, PaymentError, ProcessorOrder};

/// Mock order gateway for testing.
///
/// ```ignore
/// let gateway = MockOrderGateway::new();
/// gateway.set_error(PaymentError::authentication("bad key"));
/// ```
#[derive(Clone)]
pub struct MockOrderGateway {
    key_id: String,
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Orders handed out so far.
    issued: u64,

    /// Error to return on the next call.
    next_error: Option<PaymentError>,

    /// Requests received, in order.
    calls: Vec<CreateProcessorOrder>,
}

impl Default for MockOrderGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOrderGateway {
    pub fn new() -> Self {
        Self::with_key_id("rzp_test_mock")
    }

    pub fn with_key_id(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            inner: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Fail the next `create_order` call with this error.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<CreateProcessorOrder> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl OrderGateway for MockOrderGateway {
    async fn create_order(
        &self,
        request: CreateProcessorOrder,
    ) -> Result<ProcessorOrder, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(request.clone());

        if let Some(err) = state.next_error.take() {
            return Err(err);
        }

        state.issued += 1;
        Ok(ProcessorOrder {
            id: format!("order_mock_{}", state.issued),
            amount: request.amount,
            currency: request.currency,
        })
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: i64) -> CreateProcessorOrder {
        CreateProcessorOrder {
            amount,
            currency: "INR".to_string(),
            receipt: "receipt_test".to_string(),
            notes: Default::default(),
        }
    }

    #[tokio::test]
    async fn issues_sequential_order_ids() {
        let gateway = MockOrderGateway::new();

        let first = gateway.create_order(request(100)).await.unwrap();
        let second = gateway.create_order(request(200)).await.unwrap();

        assert_eq!(first.id, "order_mock_1");
        assert_eq!(second.id, "order_mock_2");
        assert_eq!(second.amount, 200);
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn injected_error_is_returned_once() {
        let gateway = MockOrderGateway::new();
        gateway.set_error(PaymentError::network("timeout"));

        assert!(gateway.create_order(request(100)).await.is_err());
        assert!(gateway.create_order(request(100)).await.is_ok());
    }
}
