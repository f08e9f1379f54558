//! Directory operations
//!
//! This module defines the operations provided by the directory service and
//! how their failures appear on the wire.

use crate::requests::{
    CallScope, CloseFileRequest, CreateDirectoryRequest, CreateFileRequest,
    DeleteDirectoryRequest, GetDirectoryRequest, ModifyDirectoryRequest, MoveDirectoryRequest,
    WriteFileRequest,
};
use async_trait::async_trait;
use fs_view::{DirectoryListing, PathError};
use native_client::{ClientStats, NativeError, WriterId};
use session_manager::{ClientHandle, ManagerError};
use thiserror::Error;

/// Description of an unauthorised response
pub const UNAUTHORISED: &str = "UNAUTHORISED";

/// Errors that can occur during directory operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    /// No usable client handle for the caller
    #[error("UNAUTHORISED")]
    Unauthorised,

    /// Request validation error
    #[error("{0}")]
    Path(#[from] PathError),

    /// Entry not found
    #[error("{0}")]
    NotFound(NativeError),

    /// Entry already exists
    #[error("{0}")]
    AlreadyExists(NativeError),

    /// Namespace not reachable with the caller's grants
    #[error("{0}")]
    PermissionDenied(NativeError),

    /// Any other failure
    #[error("{message}")]
    Internal { code: i64, message: String },
}

impl OperationError {
    /// HTTP-style status of the failure
    pub fn status(&self) -> u16 {
        match self {
            OperationError::Unauthorised => 401,
            OperationError::Path(_) => 400,
            OperationError::NotFound(_) => 404,
            OperationError::AlreadyExists(_) => 400,
            OperationError::PermissionDenied(_) => 400,
            OperationError::Internal { .. } => 500,
        }
    }

    /// Error code reported alongside the status
    pub fn error_code(&self) -> i64 {
        match self {
            OperationError::Unauthorised => 401,
            OperationError::Path(_) => 400,
            OperationError::NotFound(_) => 404,
            OperationError::AlreadyExists(error) | OperationError::PermissionDenied(error) => {
                error.code()
            }
            OperationError::Internal { code, .. } => *code,
        }
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<NativeError> for OperationError {
    fn from(error: NativeError) -> Self {
        match error {
            NativeError::DirectoryNotFound | NativeError::FileNotFound => {
                OperationError::NotFound(error)
            }
            NativeError::DirectoryAlreadyExists
            | NativeError::FileAlreadyExists
            | NativeError::AccountExists => OperationError::AlreadyExists(error),
            NativeError::PermissionDenied => OperationError::PermissionDenied(error),
            NativeError::InvalidCredentials => OperationError::Unauthorised,
            NativeError::InvalidDestination => OperationError::Path(PathError::InvalidPath(
                "Cannot move a directory into itself".to_string(),
            )),
            NativeError::LibraryLoad(_) => OperationError::Internal {
                code: NativeError::LIBRARY_LOAD_CODE,
                message: "LibraryLoadError".to_string(),
            },
            NativeError::SessionClosed | NativeError::InvalidWriter | NativeError::Other { .. } => {
                OperationError::Internal {
                    code: error.code(),
                    message: error.to_string(),
                }
            }
        }
    }
}

impl From<ManagerError> for OperationError {
    fn from(error: ManagerError) -> Self {
        match error {
            ManagerError::LibraryLoad(_) => OperationError::Internal {
                code: NativeError::LIBRARY_LOAD_CODE,
                message: "LibraryLoadError".to_string(),
            },
            ManagerError::Session(native) => native.into(),
            ManagerError::Aborted(message) => OperationError::Internal { code: 500, message },
        }
    }
}

impl From<tokio::task::JoinError> for OperationError {
    fn from(error: tokio::task::JoinError) -> Self {
        OperationError::Internal {
            code: 500,
            message: error.to_string(),
        }
    }
}

/// Directory operations trait
///
/// Every operation receives the handle to run on and, where a namespace is
/// addressed, the caller's scope.
#[async_trait]
pub trait DirectoryOperations: Send + Sync {
    /// Create a directory and any missing parents
    async fn create_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: CreateDirectoryRequest,
    ) -> Result<(), OperationError>;

    /// List a directory
    async fn get_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: GetDirectoryRequest,
    ) -> Result<DirectoryListing, OperationError>;

    /// Delete a directory subtree
    async fn delete_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: DeleteDirectoryRequest,
    ) -> Result<(), OperationError>;

    /// Rename a directory and/or replace its metadata
    async fn modify_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: ModifyDirectoryRequest,
    ) -> Result<(), OperationError>;

    /// Move or copy a subtree into another directory
    async fn move_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: MoveDirectoryRequest,
    ) -> Result<(), OperationError>;

    /// Create an empty file and open a writer on it
    async fn create_file(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: CreateFileRequest,
    ) -> Result<WriterId, OperationError>;

    /// Write through an open writer
    async fn write_file(&self, request: WriteFileRequest) -> Result<(), OperationError>;

    /// Commit and close a writer
    async fn close_file(&self, request: CloseFileRequest) -> Result<(), OperationError>;

    /// Close every open writer, returning how many were closed
    async fn clean(&self) -> usize;

    /// Request counters of the handle's session
    async fn stats(&self, handle: &ClientHandle) -> Result<ClientStats, OperationError>;
}
