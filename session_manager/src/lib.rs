//! # Client Handle Manager
//!
//! Owns the native library and the (at most two) native sessions of the
//! process.
//!
//! ## Philosophy
//!
//! - **Lazy and once**: The library is loaded on first use, exactly once per
//!   process; a failed load is retried by the next acquisition
//! - **Scarce, shared handles**: One anonymous and one authenticated session,
//!   cached and lent to callers as cheap clones
//! - **Serialized creation**: Library load and session creation happen under
//!   one async lock, so concurrent callers never create duplicate sessions
//! - **Explicit teardown**: Sessions are closed by `release`, never by drop
//!
//! ## State machine
//!
//! ```text
//! Uninitialized --load ok--> LibraryLoaded --acquire--> {AnonymousOpen, AuthenticatedOpen}
//!       |  ^
//!  fail |  | retry
//!       v  |
//!  LibraryLoadError
//! ```
//!
//! The two open states are independent and can coexist.

pub mod error;
pub mod handle;
pub mod manager;

pub use error::ManagerError;
pub use handle::{ClientHandle, HandleRequest, LibraryStatus, ManagerState};
pub use manager::ClientHandleManager;
