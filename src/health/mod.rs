//! Dependency probes and the aggregate health report.
//!
//! Each external dependency is checked by a [`Probe`] that never fails: every
//! error is folded into a [`ProbeOutcome`]. The report is then built by the
//! pure [`aggregate`] function, so the HTTP handler only wires the two
//! together.

mod cache;
mod database;
mod report;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use cache::{cache_client_from_url, RedisProbe};
pub use database::PostgresProbe;
pub use report::{aggregate, HealthReport};

/// Result of a single connectivity check.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome<T> {
    /// No connection information was supplied, nothing was attempted.
    NotConfigured,
    /// The dependency answered.
    Healthy(T),
    /// The attempt was made and failed with the given message.
    Failed(String),
    /// Connection information was supplied but no client could be built from it.
    Unavailable(String),
}

impl<T> ProbeOutcome<T> {
    /// Whether an attempt was made, regardless of its result.
    pub fn is_configured(&self) -> bool {
        !matches!(self, ProbeOutcome::NotConfigured)
    }

    /// Whether a client existed to talk to the dependency.
    pub fn has_client(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy(_) | ProbeOutcome::Failed(_))
    }

    /// Not-configured counts as passing.
    pub fn is_passing(&self) -> bool {
        matches!(self, ProbeOutcome::NotConfigured | ProbeOutcome::Healthy(_))
    }

    /// Message of a failed or unavailable outcome.
    pub fn error(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Failed(error) | ProbeOutcome::Unavailable(error) => Some(error),
            _ => None,
        }
    }
}

/// A connectivity check against one external dependency.
#[async_trait]
pub trait Probe: Send + Sync {
    type Output: Send;

    /// Short name used in logs and timeout messages.
    fn name(&self) -> &'static str;

    async fn probe(&self) -> ProbeOutcome<Self::Output>;
}

pub type DatabaseProbe = Arc<dyn Probe<Output = serde_json::Value>>;
pub type CacheProbe = Arc<dyn Probe<Output = ()>>;

/// The probes the health endpoint runs on each request.
#[derive(Clone)]
pub struct Probes {
    pub database: DatabaseProbe,
    pub cache: CacheProbe,
    /// Upper bound for each probe; `None` leaves it to the client libraries.
    pub timeout: Option<Duration>,
}

impl Probes {
    pub fn new(database: DatabaseProbe, cache: CacheProbe) -> Self {
        Self {
            database,
            cache,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run both probes concurrently and merge their outcomes.
    pub async fn check(&self) -> HealthReport {
        let (db, cache) = tokio::join!(
            run_probe(self.database.as_ref(), self.timeout),
            run_probe(self.cache.as_ref(), self.timeout),
        );
        aggregate(db, cache)
    }
}

/// Run a probe, applying the optional timeout and logging the outcome.
pub async fn run_probe<P>(probe: &P, timeout: Option<Duration>) -> ProbeOutcome<P::Output>
where
    P: Probe + ?Sized,
{
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, probe.probe()).await {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::Failed(format!(
                "{} probe timed out after {}s",
                probe.name(),
                limit.as_secs_f64()
            )),
        },
        None => probe.probe().await,
    };

    match &outcome {
        ProbeOutcome::NotConfigured => {
            tracing::debug!(dependency = probe.name(), "Probe skipped, not configured")
        }
        ProbeOutcome::Healthy(_) => tracing::debug!(dependency = probe.name(), "Probe succeeded"),
        ProbeOutcome::Failed(error) => {
            tracing::warn!(dependency = probe.name(), error = %error, "Probe failed")
        }
        ProbeOutcome::Unavailable(error) => {
            tracing::warn!(dependency = probe.name(), error = %error, "No client available")
        }
    }

    outcome
}
