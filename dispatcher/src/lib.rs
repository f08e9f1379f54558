//! # Request Dispatcher
//!
//! Routes inbound request envelopes to the module that serves them and turns
//! every outcome into a uniform response.
//!
//! ## Philosophy
//!
//! - **Parse once**: The `module`/`action` pair becomes an [`ipc::Request`]
//!   and is matched exhaustively
//! - **Authorization first**: Directory requests from unauthorised callers are
//!   answered before any parameter is looked at
//! - **Every request gets an answer**: Errors, including panics, are turned
//!   into failure responses tagged with the request id
//!
//! ## Modules
//!
//! - `auth`: register, login, logout and cleanup of the authenticated session
//! - `connect`: opens the anonymous session
//! - `nfs`: directory and file operations
//! - `dns`: forwarded to a registered [`SiblingEngine`]
//! - `client-stats`: request counters of the active session

pub mod dispatcher;
pub mod error;
pub mod sibling;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, UNEXPECTED_ERROR};
pub use sibling::SiblingEngine;
