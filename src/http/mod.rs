//! HTTP server module.
//!
//! The service speaks plain HTTP and is expected to run behind a TLS
//! terminating proxy. It provides:
//! - Static file services for the front-end build
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;
pub mod static_files;

pub use server::{start_server, ServerError};
pub use shutdown::shutdown_signal;
