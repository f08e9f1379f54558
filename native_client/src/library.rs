//! Library loading and session creation

use crate::{NativeError, NativeSession};
use identity::Credentials;
use std::sync::Arc;

/// Connection-state callback
///
/// Invoked by the native library on its own threads with a native state code
/// (see [`core_types::ConnectionState`]). Implementations must return quickly
/// and must not block.
pub type StateCallback = Arc<dyn Fn(i32) + Send + Sync>;

/// Loads the native library
///
/// Loading is expensive and may fail (missing binary, ABI mismatch). Callers
/// load once per process and keep the result.
pub trait LibraryLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn NativeLibrary>, NativeError>;
}

/// A loaded native library
///
/// All calls block. Every session-creating call takes the observer callback
/// that the session reports connection changes to for as long as it lives.
pub trait NativeLibrary: Send + Sync {
    /// Initializes native logging; must succeed before any session is created
    fn init_logging(&self) -> Result<(), NativeError>;

    /// Creates a session that is not bound to an account
    fn create_unregistered_client(
        &self,
        observer: StateCallback,
    ) -> Result<Arc<dyn NativeSession>, NativeError>;

    /// Opens a session for an existing account
    fn log_in(
        &self,
        credentials: &Credentials,
        observer: StateCallback,
    ) -> Result<Arc<dyn NativeSession>, NativeError>;

    /// Creates an account and opens a session for it
    fn create_account(
        &self,
        credentials: &Credentials,
        observer: StateCallback,
    ) -> Result<Arc<dyn NativeSession>, NativeError>;
}
