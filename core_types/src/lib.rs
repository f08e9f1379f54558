//! # Core Types
//!
//! This crate defines the fundamental types shared by every layer of the
//! directory service.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Handle kinds and namespace roots are closed enums
//! - **Type safety first**: Identifiers are newtypes and cannot be confused
//! - **No ambient state**: Nothing in this crate is global or mutable
//!
//! ## Key Types
//!
//! - [`RequestId`]: Identifier carried by every inbound request and its response
//! - [`HandleId`]: Identifier of one native client session
//! - [`HandleKind`]: Anonymous or authenticated session
//! - [`RootKind`]: The two namespace roots (`app` and `drive`)
//! - [`ConnectionState`]: Network state reported by the native layer

pub mod connection;
pub mod ids;
pub mod kinds;

pub use connection::ConnectionState;
pub use ids::{HandleId, RequestId};
pub use kinds::{HandleKind, RootKind};
