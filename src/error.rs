//! Top-level error type for startup and serving failures.
//!
//! Request handlers never surface these: dependency failures are reported in
//! the health response body instead.

use crate::config::ConfigError;
use crate::http::ServerError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

pub type Result<T> = std::result::Result<T, AppError>;
