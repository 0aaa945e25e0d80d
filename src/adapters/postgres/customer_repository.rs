//! PostgreSQL implementation of CustomerRepository.

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};
use crate::domain::payment::{Customer, NewCustomer};
use crate::ports::CustomerRepository;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the CustomerRepository port.
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a customer.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: CustomerId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn upsert_by_email(&self, customer: &NewCustomer) -> Result<Customer, DomainError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row: CustomerRow = sqlx::query_as(
            r#"
            INSERT INTO customers (id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, name, email, phone
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(customer.name())
        .bind(customer.email())
        .bind(customer.phone())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to upsert customer: {}", e),
            )
        })?;

        Ok(row.into())
    }
}
