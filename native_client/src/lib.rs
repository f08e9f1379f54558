//! # Native Client API
//!
//! This crate defines the boundary between the directory service and the
//! native storage-network client library.
//!
//! ## Philosophy
//!
//! The native library provides **mechanisms**, not policies:
//! - Session creation (anonymous or bound to an account)
//! - Namespace operations on an app root or the shared drive
//! - File writers
//! - Connection-state notifications through a callback
//!
//! ## Design Goals
//!
//! 1. **Testability**: The whole boundary can be simulated in memory
//! 2. **Explicitness**: A session is a value; there is no ambient client
//! 3. **Typed failures**: Every native failure carries its numeric code
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - The storage network protocol
//! - A binding generator (implementations wrap whatever the library exposes)

pub mod error;
pub mod ids;
pub mod library;
pub mod session;

pub use error::NativeError;
pub use ids::{DirectoryId, WriterId};
pub use library::{LibraryLoader, NativeLibrary, StateCallback};
pub use session::{
    ClientStats, CreateOptions, DirectoryChange, Namespace, NativeSession, TransferMode,
};
