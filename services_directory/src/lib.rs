//! # Directory Service
//!
//! This service provides directory and file operations over a native client
//! session.
//!
//! ## Philosophy
//!
//! - Every operation runs on a handle lent by the client handle manager
//! - Requests are fully validated before the native layer is touched
//! - Roots are never created, deleted, renamed or moved
//! - Native calls block, so they run on the blocking pool
//!
//! ## Operations
//!
//! - `create_directory(root, path)`: Create a directory and missing parents
//! - `get_directory(root, path)`: List a directory (the root when no path)
//! - `delete_directory(root, path)`: Delete a directory subtree
//! - `modify_directory(root, path)`: Rename and/or change metadata
//! - `move_directory(src, dest)`: Move or copy a subtree into a directory
//! - `create_file` / `write_file` / `close_file`: File writers
//! - `clean()`: Close every open writer
//! - `stats()`: Request counters of the session

pub mod operations;
pub mod requests;
pub mod service;
pub mod writers;

pub use operations::{DirectoryOperations, OperationError};
pub use requests::{
    CallScope, CloseFileRequest, CreateDirectoryRequest, CreateFileRequest,
    DeleteDirectoryRequest, GetDirectoryRequest, ModifyDirectoryRequest, MoveDirectoryRequest,
    WriteFileRequest,
};
pub use service::DirectoryService;
pub use writers::WriterRegistry;
