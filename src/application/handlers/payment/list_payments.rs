//! ListPaymentsHandler - Query handler for the payment listing.

use std::sync::Arc;

use crate::domain::payment::OrderError;
use crate::ports::{PaymentReader, PaymentSummary};

/// Handler listing every payment with its customer, newest first.
pub struct ListPaymentsHandler {
    reader: Arc<dyn PaymentReader>,
}

impl ListPaymentsHandler {
    pub fn new(reader: Arc<dyn PaymentReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self) -> Result<Vec<PaymentSummary>, OrderError> {
        Ok(self.reader.list_with_customers().await?)
    }
}
