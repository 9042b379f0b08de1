//! Batch fetcher: issue many GETs under one permit pool, one outcome per descriptor.
//!
//! Requests are multiplexed on the calling task. Each request holds a permit
//! from the shared pool only while it is on the wire, so the pool size bounds
//! in-flight requests for every `fetch_all` call sharing it. Transport errors
//! and timeouts are folded into the report and never abort sibling requests.

mod transport;

pub use transport::{HttpTransport, Transport, TransportError};

use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::descriptor::RequestDescriptor;

/// Response status of one request, or `ERROR` for a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Code(u16),
    Error,
}

impl OutcomeStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, OutcomeStatus::Error)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Code(code) => write!(f, "{}", code),
            OutcomeStatus::Error => f.write_str("ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub sequence_number: u64,
    pub target_url: String,
    pub status: OutcomeStatus,
}

/// Detail of a transport failure, kept for the end-of-run failure table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub sequence_number: u64,
    pub target_url: String,
    pub error_detail: String,
}

/// Outcomes in submission order plus the failures among them.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub outcomes: Vec<Outcome>,
    pub failures: Vec<FailureRecord>,
}

impl FetchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_error()).count()
    }
}

/// Runs descriptors through a [`Transport`] bounded by a shared permit pool.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl Fetcher {
    /// Fetcher drawing from an existing pool. Clones share the pool.
    pub fn new(transport: Arc<dyn Transport>, permits: Arc<Semaphore>, timeout: Duration) -> Self {
        Self {
            transport,
            permits,
            timeout,
        }
    }

    /// Fetcher with its own pool of `concurrency_limit` permits (minimum 1).
    pub fn with_limit(
        transport: Arc<dyn Transport>,
        concurrency_limit: usize,
        timeout: Duration,
    ) -> Self {
        let limit = concurrency_limit.clamp(1, Semaphore::MAX_PERMITS);
        Self::new(transport, Arc::new(Semaphore::new(limit)), timeout)
    }

    pub fn permits(&self) -> &Arc<Semaphore> {
        &self.permits
    }

    /// Issue every descriptor and return exactly one outcome per descriptor,
    /// in the order given.
    pub async fn fetch_all(&self, descriptors: &[RequestDescriptor]) -> FetchReport {
        let results = join_all(descriptors.iter().map(|d| self.fetch_one(d))).await;

        let mut report = FetchReport {
            outcomes: Vec::with_capacity(results.len()),
            failures: Vec::new(),
        };
        for (outcome, failure) in results {
            report.outcomes.push(outcome);
            report.failures.extend(failure);
        }
        report
    }

    async fn fetch_one(&self, descriptor: &RequestDescriptor) -> (Outcome, Option<FailureRecord>) {
        let result = match self.permits.acquire().await {
            Ok(_permit) => {
                match tokio::time::timeout(self.timeout, self.transport.get(descriptor)).await {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(self.timeout)),
                }
            }
            Err(_) => Err(TransportError::Request("permit pool closed".to_string())),
        };

        let sequence_number = descriptor.sequence_number();
        let target_url = descriptor.target_url().to_string();
        match result {
            Ok(code) => {
                tracing::info!("line {}: {} -> {}", sequence_number, target_url, code);
                let outcome = Outcome {
                    sequence_number,
                    target_url,
                    status: OutcomeStatus::Code(code),
                };
                (outcome, None)
            }
            Err(err) => {
                tracing::warn!("line {}: {} failed: {}", sequence_number, target_url, err);
                let failure = FailureRecord {
                    sequence_number,
                    target_url: target_url.clone(),
                    error_detail: err.to_string(),
                };
                let outcome = Outcome {
                    sequence_number,
                    target_url,
                    status: OutcomeStatus::Error,
                };
                (outcome, Some(failure))
            }
        }
    }
}

/// One-shot fetch with a private pool of `concurrency_limit` permits.
pub async fn fetch_all(
    transport: Arc<dyn Transport>,
    descriptors: &[RequestDescriptor],
    concurrency_limit: usize,
    timeout: Duration,
) -> FetchReport {
    Fetcher::with_limit(transport, concurrency_limit, timeout)
        .fetch_all(descriptors)
        .await
}
