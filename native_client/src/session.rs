//! Native session trait and the values it exchanges

use crate::{NativeError, WriterId};
use core_types::RootKind;
use fs_view::DirectoryListing;
use identity::{AppInfo, SafeDriveKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The namespace an operation addresses
///
/// The app namespace is private to one application. The drive namespace is
/// shared and only reachable with a grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    App(AppInfo),
    Drive(Option<SafeDriveKey>),
}

impl Namespace {
    pub fn root_kind(&self) -> RootKind {
        match self {
            Namespace::App(_) => RootKind::App,
            Namespace::Drive(_) => RootKind::Drive,
        }
    }
}

/// Options applied when a directory is created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub metadata: String,
    pub is_private: bool,
}

/// A rename and/or metadata update, applied atomically
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryChange {
    pub name: Option<String>,
    pub metadata: Option<String>,
}

impl DirectoryChange {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.metadata.is_none()
    }
}

/// Whether a transfer keeps the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferMode {
    #[default]
    Move,
    Copy,
}

impl TransferMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferMode::Move => "MOVE",
            TransferMode::Copy => "COPY",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MOVE" => Ok(TransferMode::Move),
            "COPY" => Ok(TransferMode::Copy),
            other => Err(format!("Unknown transfer mode: {}", other)),
        }
    }
}

/// Request counters of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub gets_count: u64,
    pub puts_count: u64,
    pub posts_count: u64,
    pub deletes_count: u64,
}

/// An open native session
///
/// Sessions are internally synchronized and may be called from several
/// threads at once. Every call blocks until the network answers. Paths are
/// validated component lists; the empty list is the namespace root.
pub trait NativeSession: Send + Sync {
    /// Creates a directory and any missing parents
    fn create_directory(
        &self,
        namespace: &Namespace,
        path: &[String],
        options: &CreateOptions,
    ) -> Result<(), NativeError>;

    /// Lists a directory
    fn get_directory(
        &self,
        namespace: &Namespace,
        path: &[String],
    ) -> Result<DirectoryListing, NativeError>;

    /// Deletes a directory and everything below it
    fn delete_directory(&self, namespace: &Namespace, path: &[String]) -> Result<(), NativeError>;

    /// Renames a directory and/or replaces its metadata
    fn modify_directory(
        &self,
        namespace: &Namespace,
        path: &[String],
        change: &DirectoryChange,
    ) -> Result<(), NativeError>;

    /// Moves or copies a directory to become a child of `dest_path`
    fn transfer_directory(
        &self,
        src: &Namespace,
        src_path: &[String],
        dest: &Namespace,
        dest_path: &[String],
        mode: TransferMode,
    ) -> Result<(), NativeError>;

    /// Creates an empty file and opens a writer on it
    fn create_file(
        &self,
        namespace: &Namespace,
        path: &[String],
        metadata: &str,
    ) -> Result<WriterId, NativeError>;

    /// Writes bytes through an open writer
    ///
    /// Without an offset the bytes are appended.
    fn write_file(
        &self,
        writer: WriterId,
        offset: Option<u64>,
        content: &[u8],
    ) -> Result<(), NativeError>;

    /// Commits a writer's content and closes it
    fn close_file(&self, writer: WriterId) -> Result<(), NativeError>;

    /// Request counters since the session was created
    fn stats(&self) -> Result<ClientStats, NativeError>;

    /// Releases the session and detaches its observer
    ///
    /// Calls after `close` fail with [`NativeError::SessionClosed`].
    fn close(&self);
}
