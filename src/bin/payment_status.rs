//! Waits for a payment to settle by polling the payment status endpoint.
//!
//! Exits 0 on success, 2 on failure, 3 while still processing and 1 when the
//! status could not be verified.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use payment_gateway::adapters::client::HttpPaymentStatusClient;
use payment_gateway::application::status_poller::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use payment_gateway::application::{PollOutcome, PollerConfig, StatusPoller};
use payment_gateway::domain::foundation::OrderId;

#[derive(Parser, Debug)]
#[command(name = "payment-status")]
#[command(version)]
#[command(about = "Poll a payment until the webhook settles it")]
struct Args {
    /// Razorpay order id returned by /api/create-order
    order_id: String,

    /// Base URL of the payment API
    #[arg(long, env = "PAYMENT_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    /// Seconds to wait before each status query
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    interval_secs: u64,

    /// Number of queries before reporting the payment as still processing
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let order_id = match OrderId::new(args.order_id) {
        Ok(id) => id,
        Err(error) => {
            eprintln!("Invalid order id: {}", error);
            std::process::exit(1);
        }
    };

    let client = match HttpPaymentStatusClient::new(
        &args.api_url,
        Duration::from_secs(args.timeout_secs),
    ) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    };
    let poller = StatusPoller::new(
        Arc::new(client),
        PollerConfig::new(Duration::from_secs(args.interval_secs), args.max_attempts),
    );

    let code = match poller.poll(&order_id).await {
        Ok(PollOutcome::Succeeded { attempts }) => {
            println!("Payment successful ({} checks)", attempts);
            0
        }
        Ok(PollOutcome::Failed { .. }) => {
            println!("Payment failed");
            2
        }
        Ok(PollOutcome::StillProcessing { .. }) => {
            println!("Payment is being processed. Please check back later.");
            3
        }
        Err(error) => {
            eprintln!("{}", error);
            1
        }
    };

    std::process::exit(code);
}
