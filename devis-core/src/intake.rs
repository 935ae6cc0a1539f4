//! Submission boundary for completed quotes.
//!
//! A finished wizard session produces a [`QuoteRequest`]; what happens to
//! it is behind the [`QuoteIntake`] trait. Production would POST it to the
//! workshop's intake endpoint; the shipped [`SimulatedIntake`] stands in
//! for that service by waiting out a fixed delay and always accepting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::calculations::EstimateRange;
use crate::models::ValidatedQuote;

/// The outbound "new quote request" message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub quote: ValidatedQuote,
    pub estimate: EstimateRange,
    pub submitted_at: DateTime<Utc>,
}

impl QuoteRequest {
    pub fn new(quote: ValidatedQuote, estimate: EstimateRange) -> Self {
        Self {
            quote,
            estimate,
            submitted_at: Utc::now(),
        }
    }
}

/// Acknowledgement returned by an intake service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeReceipt {
    /// Reference the customer can quote back, e.g. `DEV-20250114-0001`.
    pub reference: String,
    pub received_at: DateTime<Utc>,
}

/// Errors an intake implementation may report.
///
/// The simulated intake never fails; these exist for the trait contract so
/// a real client can surface transport and rejection failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("intake service unavailable: {0}")]
    Unavailable(String),

    #[error("intake rejected the request: {0}")]
    Rejected(String),
}

/// Destination for completed quote requests.
#[async_trait]
pub trait QuoteIntake: Send + Sync {
    async fn send(&self, request: &QuoteRequest) -> Result<IntakeReceipt, IntakeError>;
}

/// Default delay of the simulated intake, matching the artificial wait the
/// customer sees before the confirmation view.
pub const SIMULATED_DELAY: Duration = Duration::from_secs(2);

/// Stand-in intake: waits a fixed delay, then accepts.
///
/// There is no cancellation path and no failure mode; a submission that
/// starts always completes.
#[derive(Debug)]
pub struct SimulatedIntake {
    delay: Duration,
    counter: AtomicU64,
}

impl SimulatedIntake {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SimulatedIntake {
    fn default() -> Self {
        Self::new(SIMULATED_DELAY)
    }
}

#[async_trait]
impl QuoteIntake for SimulatedIntake {
    async fn send(&self, request: &QuoteRequest) -> Result<IntakeReceipt, IntakeError> {
        tokio::time::sleep(self.delay).await;

        let received_at = Utc::now();
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let reference = format!("DEV-{}-{sequence:04}", received_at.format("%Y%m%d"));
        info!(
            reference,
            project = request.quote.spec.project_type.as_str(),
            min = %request.estimate.min,
            max = %request.estimate.max,
            "quote request accepted"
        );

        Ok(IntakeReceipt {
            reference,
            received_at,
        })
    }
}
