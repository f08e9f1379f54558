//! # Simulated Storage Network
//!
//! This crate provides an in-memory implementation of the native client
//! boundary.
//!
//! ## Purpose
//!
//! The simulated network allows testing the directory service without the
//! real library:
//! - Runs under `cargo test`
//! - Deterministic faults (failed loads, failed calls, added latency)
//! - Inspectable (sessions, accounts and load attempts are visible)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! This is not a mock that records calls. It keeps real directory trees,
//! enforces the same conflicts and permissions, and reports connection
//! changes through the observer callbacks like the real library does.

pub mod config;
pub mod fault_injection;
pub mod network;
pub mod session;
pub mod tree;

pub use config::SimNetworkConfig;
pub use fault_injection::{FaultPlan, NativeFault};
pub use network::SimNetwork;
pub use session::SimSession;
pub use tree::{DirectoryTree, RootKey, DRIVE_ROOT_NAME};

use std::sync::{Mutex, MutexGuard};

/// Locks a mutex, recovering the data if a holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
