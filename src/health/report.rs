//! The merged health record and the pure function that builds it.

use axum::http::StatusCode;
use serde::Serialize;

use super::ProbeOutcome;
use crate::config::FRAMEWORK;

/// Body of the health endpoint.
///
/// `neon` records whether a database URL was supplied and `redis` whether a
/// cache client was obtained; whether the check succeeded is carried
/// separately by `db` and the `*_error` fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub ok: bool,
    pub framework: String,
    pub neon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_error: Option<String>,
    pub redis: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_error: Option<String>,
}

impl HealthReport {
    pub fn status_code(&self) -> StatusCode {
        if self.ok {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Merge the database and cache outcomes into one report.
pub fn aggregate(db: ProbeOutcome<serde_json::Value>, cache: ProbeOutcome<()>) -> HealthReport {
    let ok = db.is_passing() && cache.is_passing();
    let neon = db.is_configured();
    let redis = cache.has_client();
    let db_error = db.error().map(str::to_string);
    let redis_error = cache.error().map(str::to_string);

    let db = match db {
        ProbeOutcome::Healthy(row) => Some(row),
        _ => None,
    };

    HealthReport {
        ok,
        framework: FRAMEWORK.to_string(),
        neon,
        db,
        db_error,
        redis,
        redis_error,
    }
}
