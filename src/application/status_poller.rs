//! Bounded client-side status poller.
//!
//! After checkout the browser only knows the order id; the webhook settles
//! the payment asynchronously. The poller asks for the status at a fixed
//! interval until it is terminal or the attempt budget runs out.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::foundation::OrderId;
use crate::domain::payment::PaymentStatus;
use crate::ports::{PaymentStatusSource, StatusQueryError};

/// Delay before each status query.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Queries made before giving up with `StillProcessing`.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Polling cadence and budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollerConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }
}

/// Definitive result of a polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Payment reached `success`.
    Succeeded { attempts: u32 },
    /// Payment reached `failed`.
    Failed { attempts: u32 },
    /// Still `pending` after the last allowed attempt.
    StillProcessing { attempts: u32 },
}

/// A status query failed; polling stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not verify payment: {source}")]
pub struct PollError {
    pub attempts: u32,
    #[source]
    pub source: StatusQueryError,
}

/// Polls a `PaymentStatusSource` until the payment settles.
pub struct StatusPoller {
    source: Arc<dyn PaymentStatusSource>,
    config: PollerConfig,
}

impl StatusPoller {
    pub fn new(source: Arc<dyn PaymentStatusSource>, config: PollerConfig) -> Self {
        Self { source, config }
    }

    pub async fn poll(&self, order_id: &OrderId) -> Result<PollOutcome, PollError> {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            tokio::time::sleep(self.config.interval).await;

            let status = self
                .source
                .fetch_status(order_id)
                .await
                .map_err(|source| {
                    tracing::warn!(
                        order_id = %order_id,
                        attempt,
                        error = %source,
                        "Status query failed"
                    );
                    PollError {
                        attempts: attempt,
                        source,
                    }
                })?;

            match status {
                PaymentStatus::Success => return Ok(PollOutcome::Succeeded { attempts: attempt }),
                PaymentStatus::Failed => return Ok(PollOutcome::Failed { attempts: attempt }),
                PaymentStatus::Pending => {
                    tracing::debug!(order_id = %order_id, attempt, "Payment still pending");
                }
            }
        }

        Ok(PollOutcome::StillProcessing {
            attempts: max_attempts,
        })
    }
}
