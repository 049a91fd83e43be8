//! Redis liveness probe and the client factory it is built from.

use async_trait::async_trait;

use super::{Probe, ProbeOutcome};

/// Build a Redis client from an optional connection string.
///
/// `Ok(None)` means no cache is configured, which is not an error.
pub fn cache_client_from_url(
    url: Option<&str>,
) -> Result<Option<redis::Client>, redis::RedisError> {
    url.map(redis::Client::open).transpose()
}

enum CacheClient {
    Absent,
    Invalid(String),
    Ready(redis::Client),
}

/// Sends `PING` over a connection opened for this check only.
pub struct RedisProbe {
    client: CacheClient,
}

impl RedisProbe {
    pub fn new(client: Option<redis::Client>) -> Self {
        let client = match client {
            Some(client) => CacheClient::Ready(client),
            None => CacheClient::Absent,
        };
        Self { client }
    }

    /// Build through [`cache_client_from_url`].
    ///
    /// A rejected URL leaves no client, which every check reports as unavailable.
    pub fn from_url(url: Option<&str>) -> Self {
        match cache_client_from_url(url) {
            Ok(client) => Self::new(client),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid Redis connection string");
                Self {
                    client: CacheClient::Invalid(e.to_string()),
                }
            }
        }
    }

    async fn ping(client: &redis::Client) -> Result<(), redis::RedisError> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        tracing::trace!(reply = %reply, "Redis PING");
        Ok(())
    }
}

#[async_trait]
impl Probe for RedisProbe {
    type Output = ();

    fn name(&self) -> &'static str {
        "redis"
    }

    async fn probe(&self) -> ProbeOutcome<()> {
        match &self.client {
            CacheClient::Absent => ProbeOutcome::NotConfigured,
            CacheClient::Invalid(error) => ProbeOutcome::Unavailable(error.clone()),
            CacheClient::Ready(client) => match Self::ping(client).await {
                Ok(()) => ProbeOutcome::Healthy(()),
                Err(e) => ProbeOutcome::Failed(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_without_url() {
        assert!(cache_client_from_url(None).unwrap().is_none());
    }

    #[test]
    fn test_factory_with_url() {
        let client = cache_client_from_url(Some("redis://127.0.0.1:6379")).unwrap();
        assert!(client.is_some());
    }

    #[test]
    fn test_factory_rejects_bad_scheme() {
        assert!(cache_client_from_url(Some("http://127.0.0.1:6379")).is_err());
    }

    #[tokio::test]
    async fn test_no_client_is_not_configured() {
        let outcome = RedisProbe::new(None).probe().await;
        assert_eq!(outcome, ProbeOutcome::NotConfigured);
    }

    #[tokio::test]
    async fn test_invalid_url_is_unavailable_on_every_check() {
        let probe = RedisProbe::from_url(Some("http://127.0.0.1:6379"));
        for _ in 0..2 {
            assert!(matches!(probe.probe().await, ProbeOutcome::Unavailable(_)));
        }
    }

    #[tokio::test]
    async fn test_invalid_url_reports_no_client() {
        let cache = RedisProbe::from_url(Some("http://127.0.0.1:6379")).probe().await;
        let report = crate::health::aggregate(ProbeOutcome::NotConfigured, cache);
        let body = serde_json::to_value(&report).unwrap();

        assert_eq!(body["ok"], false);
        assert_eq!(body["redis"], false);
        assert!(body["redisError"].as_str().is_some_and(|e| !e.is_empty()));
    }
}
