//! Manager error types

use native_client::NativeError;
use thiserror::Error;

/// Errors that can occur while acquiring a client handle
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManagerError {
    /// The native library failed to load or initialize
    #[error("Library load failed: {0}")]
    LibraryLoad(NativeError),

    /// The library is loaded but refused to open the session
    #[error("Session creation failed: {0}")]
    Session(#[from] NativeError),

    /// The blocking native call did not complete
    #[error("Native call aborted: {0}")]
    Aborted(String),
}

impl From<tokio::task::JoinError> for ManagerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ManagerError::Aborted(err.to_string())
    }
}
