//! Payment gateway HTTP server.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use payment_gateway::adapters::http::{build_app, PaymentAppState};
use payment_gateway::adapters::memory::InMemoryPaymentStore;
use payment_gateway::adapters::postgres::{PostgresCustomerRepository, PostgresPaymentRepository};
use payment_gateway::adapters::razorpay::{RazorpayGatewayConfig, RazorpayOrderGateway};
use payment_gateway::config::{AppConfig, ConfigError, DatabaseConfig, ValidationError};
use payment_gateway::domain::payment::WebhookVerifier;
use payment_gateway::ports::PaymentError;

/// Errors that abort startup.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Payment gateway error: {0}")]
    Gateway(#[from] PaymentError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        tracing::error!(error = %error, "Payment gateway exited with error");
        eprintln!("payment-gateway: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let state = build_state(&config).await?;
    let app = build_app(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        address = %addr,
        environment = ?config.server.environment,
        test_mode = config.razorpay.is_test_mode(),
        "Payment gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Payment gateway stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_state(config: &AppConfig) -> Result<PaymentAppState, StartupError> {
    let razorpay = &config.razorpay;
    let gateway = RazorpayOrderGateway::new(
        RazorpayGatewayConfig::new(razorpay.key_id.clone(), razorpay.key_secret.clone())
            .with_base_url(razorpay.api_base_url.clone()),
    )?;
    let webhook_verifier = WebhookVerifier::new(razorpay.webhook_secret.expose_secret().as_str());

    let state = match &config.database {
        Some(database) => {
            let pool = connect(database).await?;
            let payments = Arc::new(PostgresPaymentRepository::new(pool.clone()));
            PaymentAppState {
                customer_repository: Arc::new(PostgresCustomerRepository::new(pool)),
                payment_repository: payments.clone(),
                payment_reader: payments,
                order_gateway: Arc::new(gateway),
                webhook_verifier,
                currency: razorpay.currency.clone(),
            }
        }
        None => {
            tracing::warn!("No database configured, payments are kept in memory only");
            let store = Arc::new(InMemoryPaymentStore::new());
            PaymentAppState {
                customer_repository: store.clone(),
                payment_repository: store.clone(),
                payment_reader: store,
                order_gateway: Arc::new(gateway),
                webhook_verifier,
                currency: razorpay.currency.clone(),
            }
        }
    };

    Ok(state)
}

async fn connect(database: &DatabaseConfig) -> Result<sqlx::PgPool, StartupError> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .connect(&database.url)
        .await?;

    tracing::info!(
        max_connections = database.max_connections,
        "Postgres connection pool established"
    );

    if database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received ctrl+C signal, shutting down"),
        Err(error) => {
            tracing::error!(error = %error, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
