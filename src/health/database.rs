//! PostgreSQL connectivity probe.

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

use super::{Probe, ProbeOutcome};

/// Round-trip query; its single row is returned to the caller as a JSON object.
const PROBE_QUERY: &str = "SELECT row_to_json(r) FROM (SELECT now() AS now) r";

/// Opens a fresh connection per check and runs [`PROBE_QUERY`].
///
/// No pool is kept: the connection lives only for the duration of one probe.
pub struct PostgresProbe {
    url: Option<String>,
}

impl PostgresProbe {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }

    async fn round_trip(url: &str) -> Result<serde_json::Value, sqlx::Error> {
        let mut conn = PgConnection::connect(url).await?;
        let row = sqlx::query_scalar::<_, serde_json::Value>(PROBE_QUERY)
            .fetch_one(&mut conn)
            .await;

        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "Failed to close probe connection cleanly");
        }

        row
    }
}

#[async_trait]
impl Probe for PostgresProbe {
    type Output = serde_json::Value;

    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn probe(&self) -> ProbeOutcome<serde_json::Value> {
        let Some(url) = self.url.as_deref() else {
            return ProbeOutcome::NotConfigured;
        };

        match Self::round_trip(url).await {
            Ok(row) => ProbeOutcome::Healthy(row),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}
