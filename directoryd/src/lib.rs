//! # Directory Service Daemon
//!
//! This crate provides the process that hosts the directory service.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: Requests arrive as JSON lines on stdin; responses and
//!   connection events leave as JSON lines on stdout
//! - **Logs stay out of the protocol**: Diagnostics go to stderr
//! - **One manager per process**: The daemon builds the client handle
//!   manager once and shares it with every request
//! - **Orderly exit**: On end of input or interrupt, open writers are closed
//!   before client handles are released
//!
//! ## Non-Responsibilities
//!
//! The daemon does NOT:
//! - Terminate HTTP or issue tokens; requests carry their own `auth`
//! - Talk to a real network; it hosts the simulated native library

pub mod config;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, DaemonConfig};
pub use logging::init_logging;
pub use runtime::{DaemonError, DaemonRuntime};
