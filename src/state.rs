//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::health::Probes;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the configuration and the dependency probes run by the health
/// endpoint. Probes are injected rather than looked up so tests can swap them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub probes: Probes,
}

impl AppState {
    /// Creates a new application state from the given configuration and probes.
    pub fn new(config: AppConfig, probes: Probes) -> Self {
        Self {
            config: Arc::new(config),
            probes,
        }
    }
}
