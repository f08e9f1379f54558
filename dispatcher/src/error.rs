//! Dispatch errors and their wire form

use core_types::RequestId;
use fs_view::PathError;
use ipc::{Response, RouteError};
use services_directory::OperationError;
use session_manager::ManagerError;
use thiserror::Error;

/// Prefix of the description sent when a request panicked
pub const UNEXPECTED_ERROR: &str = "UNEXPECTED_ERROR";

/// Errors that end a dispatch
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Unknown module or action
    #[error("{0}")]
    Route(#[from] RouteError),

    /// The operation failed
    #[error("{0}")]
    Operation(#[from] OperationError),

    /// A result could not be encoded
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// The handler panicked
    #[error("{UNEXPECTED_ERROR}: {0}")]
    Panicked(String),
}

impl From<PathError> for DispatchError {
    fn from(error: PathError) -> Self {
        DispatchError::Operation(error.into())
    }
}

impl From<ManagerError> for DispatchError {
    fn from(error: ManagerError) -> Self {
        DispatchError::Operation(error.into())
    }
}

impl DispatchError {
    /// Failure response answering request `id`
    pub fn to_response(&self, id: RequestId) -> Response {
        match self {
            DispatchError::Route(error) => Response::failure(id, 400, 400, error.to_string()),
            DispatchError::Operation(error) => {
                Response::failure(id, error.status(), error.error_code(), error.description())
            }
            DispatchError::Encode(_) | DispatchError::Panicked(_) => {
                Response::failure(id, 500, 500, self.to_string())
            }
        }
    }
}
