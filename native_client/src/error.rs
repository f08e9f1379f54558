//! Native error types

use thiserror::Error;

/// Errors reported by the native library
///
/// Each variant has a stable numeric code; the display text is the native
/// description that callers see.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NativeError {
    /// The library could not be loaded or initialized
    #[error("LibraryLoadError: {0}")]
    LibraryLoad(String),

    #[error("CoreError::AccountExists")]
    AccountExists,

    #[error("CoreError::InvalidCredentials")]
    InvalidCredentials,

    /// The session was released
    #[error("CoreError::SessionClosed")]
    SessionClosed,

    #[error("NfsError::DirectoryAlreadyExistsWithSameName")]
    DirectoryAlreadyExists,

    #[error("NfsError::DirectoryNotFound")]
    DirectoryNotFound,

    #[error("NfsError::FileNotFound")]
    FileNotFound,

    #[error("NfsError::FileAlreadyExistsWithSameName")]
    FileAlreadyExists,

    /// Move or copy into the source itself or one of its descendants
    #[error("NfsError::InvalidDestination")]
    InvalidDestination,

    /// Writer is unknown or already closed
    #[error("NfsError::InvalidWriterHandle")]
    InvalidWriter,

    #[error("FfiError::PermissionDenied")]
    PermissionDenied,

    /// Any other failure, passed through untouched
    #[error("{message}")]
    Other { code: i64, message: String },
}

impl NativeError {
    pub const LIBRARY_LOAD_CODE: i64 = -2;
    pub const DIRECTORY_ALREADY_EXISTS_CODE: i64 = -1001;
    pub const PERMISSION_DENIED_CODE: i64 = -1504;

    /// Numeric code of this error
    pub fn code(&self) -> i64 {
        match self {
            NativeError::LibraryLoad(_) => Self::LIBRARY_LOAD_CODE,
            NativeError::AccountExists => -10,
            NativeError::InvalidCredentials => -11,
            NativeError::SessionClosed => -12,
            NativeError::DirectoryAlreadyExists => Self::DIRECTORY_ALREADY_EXISTS_CODE,
            NativeError::DirectoryNotFound => -1002,
            NativeError::FileNotFound => -1003,
            NativeError::FileAlreadyExists => -1004,
            NativeError::InvalidDestination => -1005,
            NativeError::InvalidWriter => -1006,
            NativeError::PermissionDenied => Self::PERMISSION_DENIED_CODE,
            NativeError::Other { code, .. } => *code,
        }
    }

    /// Returns true if the error reports a missing entry
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NativeError::DirectoryNotFound | NativeError::FileNotFound
        )
    }

    /// Returns true if the error reports a name collision
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            NativeError::DirectoryAlreadyExists
                | NativeError::FileAlreadyExists
                | NativeError::AccountExists
        )
    }
}
