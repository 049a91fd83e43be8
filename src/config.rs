//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file and defines
//! constants for HTTP cache headers, routing prefixes, environment variable
//! names and logging defaults. `AppConfig` is the root configuration struct.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Fingerprinted front-end assets never change under the same URL, so they can
// be cached by browsers and CDNs for a full year.
//
// References:
// - RFC 9111 (HTTP Caching): https://httpwg.org/specs/rfc9111.html
// - RFC 8246 (immutable): https://httpwg.org/specs/rfc8246.html

/// Static assets - one year
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 31_536_000;

pub const CACHE_CONTROL_STATIC: &str =
    formatcp!("public, max-age={}, immutable", HTTP_CACHE_STATIC_MAX_AGE);

/// Health responses must never be served from a cache
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Routing
// =============================================================================

/// Requests under this prefix are never rewritten to the front end
pub const API_PREFIX: &str = "/api";

/// Aggregate dependency health endpoint
pub const HEALTH_PATH: &str = formatcp!("{}/health", API_PREFIX);

/// Accept header fragment that marks a request as an API call
pub const API_CONTENT_TYPE: &str = "application/json";

/// Identifier of the serving stack reported by the health endpoint
pub const FRAMEWORK: &str = "axum";

// =============================================================================
// Environment
// =============================================================================

/// Default environment variable holding the PostgreSQL connection string
pub const DEFAULT_DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Default environment variable holding the Redis connection string
pub const DEFAULT_REDIS_URL_ENV: &str = "REDIS_URL";

// =============================================================================
// Default Paths and Strings
// =============================================================================

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Directory the front-end build is served from
pub const DEFAULT_STATIC_DIR: &str = "public";

/// URL prefix (and subdirectory of the static dir) for fingerprinted assets
pub const DEFAULT_ASSET_PREFIX: &str = "/assets";

/// Document every front-end route is rewritten to
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "vitals=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Seconds to wait for in-flight requests after a shutdown signal
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpServerConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Front-end hosting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// Root of the front-end build output
    #[serde(default = "StaticFilesConfig::default_dir")]
    pub dir: String,
    /// URL prefix for long-lived assets, served from `<dir><asset_prefix>`
    #[serde(default = "StaticFilesConfig::default_asset_prefix")]
    pub asset_prefix: String,
    /// File (relative to `dir`) served for front-end routes
    #[serde(default = "StaticFilesConfig::default_index")]
    pub index: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            asset_prefix: Self::default_asset_prefix(),
            index: Self::default_index(),
        }
    }
}

impl StaticFilesConfig {
    fn default_dir() -> String {
        DEFAULT_STATIC_DIR.to_string()
    }

    fn default_asset_prefix() -> String {
        DEFAULT_ASSET_PREFIX.to_string()
    }

    fn default_index() -> String {
        DEFAULT_INDEX_FILE.to_string()
    }

    /// Directory on disk holding the assets served under `asset_prefix`.
    pub fn asset_dir(&self) -> String {
        format!(
            "{}/{}",
            self.dir.trim_end_matches('/'),
            self.asset_prefix.trim_start_matches('/')
        )
    }

    /// Path on disk of the index document.
    pub fn index_path(&self) -> String {
        format!("{}/{}", self.dir.trim_end_matches('/'), self.index)
    }
}

/// Dependency probe configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Environment variable read for the PostgreSQL connection string
    #[serde(default = "HealthConfig::default_database_url_env")]
    pub database_url_env: String,
    /// Environment variable read for the Redis connection string
    #[serde(default = "HealthConfig::default_redis_url_env")]
    pub redis_url_env: String,
    /// Upper bound on a single probe; client library defaults apply when unset
    pub probe_timeout_seconds: Option<u64>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            database_url_env: Self::default_database_url_env(),
            redis_url_env: Self::default_redis_url_env(),
            probe_timeout_seconds: None,
        }
    }
}

impl HealthConfig {
    fn default_database_url_env() -> String {
        DEFAULT_DATABASE_URL_ENV.to_string()
    }

    fn default_redis_url_env() -> String {
        DEFAULT_REDIS_URL_ENV.to_string()
    }

    /// Look up a connection string, treating an empty value as unset.
    pub fn lookup(var: &str) -> Option<String> {
        std::env::var(var).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.static_files.asset_prefix;
        if !prefix.starts_with('/') || prefix == "/" {
            return Err(ConfigError::Validation(format!(
                "static_files.asset_prefix must start with '/' and name a directory, got '{}'",
                prefix
            )));
        }
        if prefix.ends_with('/') || prefix.contains("//") {
            return Err(ConfigError::Validation(format!(
                "static_files.asset_prefix '{}' must not contain empty segments or end with '/'",
                prefix
            )));
        }
        if prefix.contains(['*', '{', '}', ':']) {
            return Err(ConfigError::Validation(format!(
                "static_files.asset_prefix '{}' must be a literal path without route parameters",
                prefix
            )));
        }
        if prefix == API_PREFIX || prefix.starts_with(formatcp!("{}/", API_PREFIX)) {
            return Err(ConfigError::Validation(format!(
                "static_files.asset_prefix '{}' overlaps the API prefix",
                prefix
            )));
        }

        if self.health.database_url_env.trim().is_empty() {
            return Err(ConfigError::Validation(
                "health.database_url_env cannot be empty".to_string(),
            ));
        }
        if self.health.redis_url_env.trim().is_empty() {
            return Err(ConfigError::Validation(
                "health.redis_url_env cannot be empty".to_string(),
            ));
        }
        if self.health.probe_timeout_seconds == Some(0) {
            return Err(ConfigError::Validation(
                "health.probe_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cache_control_static_is_one_year_immutable() {
        assert_eq!(
            CACHE_CONTROL_STATIC,
            "public, max-age=31536000, immutable"
        );
    }

    #[test]
    fn test_health_path() {
        assert_eq!(HEALTH_PATH, "/api/health");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.static_files.dir, "public");
        assert_eq!(config.static_files.asset_prefix, "/assets");
        assert_eq!(config.health.database_url_env, "DATABASE_URL");
        assert_eq!(config.health.redis_url_env, "REDIS_URL");
        assert!(config.health.probe_timeout_seconds.is_none());
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::parse(
            r#"
            [http]
            host = "127.0.0.1"
            port = 8080

            [static_files]
            dir = "dist/"
            asset_prefix = "/static"
            index = "app.html"

            [health]
            database_url_env = "NEON_DATABASE_URL"
            redis_url_env = "KV_URL"
            probe_timeout_seconds = 3

            [logging]
            format = "JSON"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.static_files.asset_dir(), "dist/static");
        assert_eq!(config.static_files.index_path(), "dist/app.html");
        assert_eq!(config.health.database_url_env, "NEON_DATABASE_URL");
        assert_eq!(config.health.probe_timeout_seconds, Some(3));
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_rejects_root_asset_prefix() {
        let err = AppConfig::parse("[static_files]\nasset_prefix = \"/\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_asset_prefix_route_syntax() {
        for prefix in ["/assets/*rest", "/assets/{file}", "/assets/", "/a//b"] {
            let contents = format!("[static_files]\nasset_prefix = \"{}\"\n", prefix);
            let err = AppConfig::parse(&contents).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation(_)),
                "{} should be rejected",
                prefix
            );
        }
    }

    #[test]
    fn test_accepts_nested_asset_prefix() {
        let config =
            AppConfig::parse("[static_files]\nasset_prefix = \"/static/build\"\n").unwrap();
        assert_eq!(config.static_files.asset_dir(), "public/static/build");
    }

    #[test]
    fn test_rejects_asset_prefix_under_api() {
        let err = AppConfig::parse("[static_files]\nasset_prefix = \"/api/assets\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = AppConfig::parse("[health]\nprobe_timeout_seconds = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let err = AppConfig::parse("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: logging.format must be 'text' or 'json', got 'xml'"
        );
    }

    #[test]
    fn test_parse_error() {
        let err = AppConfig::parse("[http\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 4000").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.port, 4000);
    }

    #[test]
    fn test_packaged_config_is_valid() {
        let config =
            AppConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/dist/vitals.toml")).unwrap();
        assert_eq!(config.static_files.asset_dir(), "/usr/share/vitals/public/assets");
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/vitals.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
