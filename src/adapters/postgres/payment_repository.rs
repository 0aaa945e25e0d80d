//! PostgreSQL implementation of PaymentRepository and PaymentReader.
//!
//! Status changes are a single conditional `UPDATE ... WHERE status = 'pending'`
//! so concurrent webhook deliveries cannot move a payment twice.

use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, OrderId, PaymentRecordId, ProcessorPaymentId, Timestamp,
};
use crate::domain::payment::{Amount, Payment, PaymentStatus, PaymentTransition};
use crate::ports::{CustomerContact, PaymentReader, PaymentRepository, PaymentSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const ORDER_ID_CONSTRAINT: &str = "payments_order_id_key";

/// PostgreSQL implementation of the payment ports.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    order_id: String,
    customer_id: Uuid,
    amount: i64,
    currency: String,
    status: String,
    payment_id: Option<String>,
    description: String,
    created_at: DateTime<Utc>,
}

/// Payment row joined with its customer's contact details.
#[derive(Debug, sqlx::FromRow)]
struct PaymentWithCustomerRow {
    #[sqlx(flatten)]
    payment: PaymentRow,
    customer_name: Option<String>,
    customer_email: Option<String>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid {} in payment {}: {}", field, row.id, e),
            )
        };

        let order_id = OrderId::new(row.order_id.clone()).map_err(|e| corrupt("order_id", &e))?;
        let amount = Amount::new(row.amount).map_err(|e| corrupt("amount", &e))?;
        let status = PaymentStatus::parse(&row.status).map_err(|e| corrupt("status", &e))?;
        let payment_id = row
            .payment_id
            .clone()
            .map(ProcessorPaymentId::new)
            .transpose()
            .map_err(|e| corrupt("payment_id", &e))?;

        Ok(Payment {
            id: PaymentRecordId::from_uuid(row.id),
            order_id,
            customer_id: CustomerId::from_uuid(row.customer_id),
            amount,
            currency: row.currency,
            status,
            payment_id,
            description: row.description,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

impl TryFrom<PaymentWithCustomerRow> for PaymentSummary {
    type Error = DomainError;

    fn try_from(row: PaymentWithCustomerRow) -> Result<Self, Self::Error> {
        let customer = match (row.customer_name, row.customer_email) {
            (Some(name), Some(email)) => Some(CustomerContact { name, email }),
            _ => None,
        };

        Ok(PaymentSummary {
            payment: row.payment.try_into()?,
            customer,
        })
    }
}

fn database_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, e),
    )
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, order_id, customer_id, amount, currency, status,
                payment_id, description, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.order_id.as_str())
        .bind(payment.customer_id.as_uuid())
        .bind(payment.amount.major_units())
        .bind(&payment.currency)
        .bind(payment.status.as_str())
        .bind(payment.payment_id.as_ref().map(|id| id.as_str()))
        .bind(&payment.description)
        .bind(payment.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(ORDER_ID_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::Conflict,
                        format!("Payment for order {} already exists", payment.order_id),
                    );
                }
            }
            database_error("insert payment", e)
        })?;

        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, order_id, customer_id, amount, currency, status,
                   payment_id, description, created_at
            FROM payments
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn transition_if_pending(
        &self,
        order_id: &OrderId,
        transition: &PaymentTransition,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = $2, payment_id = $3
            WHERE order_id = $1 AND status = 'pending'
            "#,
        )
        .bind(order_id.as_str())
        .bind(transition.target().as_str())
        .bind(transition.payment_id().map(|id| id.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update payment status", e))?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl PaymentReader for PostgresPaymentRepository {
    async fn list_with_customers(&self) -> Result<Vec<PaymentSummary>, DomainError> {
        let rows: Vec<PaymentWithCustomerRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.order_id, p.customer_id, p.amount, p.currency, p.status,
                   p.payment_id, p.description, p.created_at,
                   c.name AS customer_name, c.email AS customer_email
            FROM payments p
            LEFT JOIN customers c ON c.id = p.customer_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list payments", e))?;

        rows.into_iter().map(PaymentSummary::try_from).collect()
    }
}
