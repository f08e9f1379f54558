//! # Filesystem View
//!
//! This crate provides the path-addressed view over the storage network's
//! directories.
//!
//! ## Philosophy
//!
//! - **Paths are views, not authority**: Resolving a path never grants access
//! - **Validate before touching the network**: Every request shape error is
//!   caught here, before a native call is made
//! - **Roots are immutable by name**: The root of a namespace can be read and
//!   listed, never created, deleted or renamed
//!
//! ## Design
//!
//! - A path is anchored at a [`RootKind`](core_types::RootKind) and split into
//!   validated components; the root itself is the empty component list
//! - [`PathResolver`] applies the rules that depend on the kind of mutation
//! - [`RequestFields`] type-checks optional fields and names the offending one
//! - [`DirectoryListing`] is what a read returns

pub mod directory;
pub mod fields;
pub mod path;

pub use directory::{DirectoryInfo, DirectoryListing, FileInfo};
pub use fields::RequestFields;
pub use path::{MutationKind, PathError, PathResolver, ValidatedPath};
