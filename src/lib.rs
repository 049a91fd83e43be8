//! Vitals: dependency health endpoint and static front-end host.
//!
//! Serves a single-page front end from disk and a `/api/health` endpoint that
//! reports whether PostgreSQL and Redis are reachable.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use health::{HealthReport, Probe, ProbeOutcome, Probes};
pub use routes::create_router;
pub use state::AppState;
