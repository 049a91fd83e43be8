//! Vitals entry point.
//!
//! Initializes tracing, loads configuration, reads the dependency connection
//! strings from the environment, builds the probes, sets up the Axum router
//! and starts the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitals::config::{AppConfig, HealthConfig, DEFAULT_LOG_FILTER, HEALTH_PATH};
use vitals::health::{PostgresProbe, Probes, RedisProbe};
use vitals::{create_router, AppState};

/// Vitals: dependency health endpoint and static front-end host
#[derive(Parser, Debug)]
#[command(name = "vitals", version, about)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "vitals=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> vitals::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(config = ?args.config, "Loaded configuration");

    let database_url = HealthConfig::lookup(&config.health.database_url_env);
    let redis_url = HealthConfig::lookup(&config.health.redis_url_env);

    tracing::info!(
        database = %config.health.database_url_env,
        configured = database_url.is_some(),
        "PostgreSQL probe"
    );
    tracing::info!(
        cache = %config.health.redis_url_env,
        configured = redis_url.is_some(),
        "Redis probe"
    );

    let probes = Probes::new(
        Arc::new(PostgresProbe::new(database_url)),
        Arc::new(RedisProbe::from_url(redis_url.as_deref())),
    )
    .with_timeout(config.health.probe_timeout_seconds.map(Duration::from_secs));

    tracing::info!(
        dir = %config.static_files.dir,
        assets = %config.static_files.asset_prefix,
        index = %config.static_files.index,
        health = HEALTH_PATH,
        "Serving front end"
    );

    let state = AppState::new(config.clone(), probes);
    let app = create_router(state);

    vitals::http::start_server(app, &config.http).await?;

    Ok(())
}
