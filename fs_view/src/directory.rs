//! Directory listing types
//!
//! This module defines how directories and files are represented when a
//! directory is read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of a single directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryInfo {
    /// Name of the directory (last path component)
    pub name: String,
    /// Caller-supplied metadata, empty by default
    #[serde(default)]
    pub metadata: String,
    /// Fixed at creation time
    #[serde(default)]
    pub is_private: bool,
    /// Read-only; decided by the network
    #[serde(default)]
    pub is_versioned: bool,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl DirectoryInfo {
    /// Creates directory metadata stamped with the given creation time
    pub fn new(name: impl Into<String>, created_on: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            metadata: String::new(),
            is_private: false,
            is_versioned: false,
            created_on,
            modified_on: created_on,
        }
    }

    /// Sets the metadata
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// Sets the privacy flag
    pub fn with_private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    /// Sets the versioning flag
    pub fn with_versioned(mut self, is_versioned: bool) -> Self {
        self.is_versioned = is_versioned;
        self
    }

    /// Records a mutation at `now`
    ///
    /// `modified_on` never moves backwards, even if the clock does.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.modified_on {
            self.modified_on = now;
        }
    }
}

/// Metadata of a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    /// Size of the committed content in bytes
    pub size: u64,
    #[serde(default)]
    pub metadata: String,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl FileInfo {
    /// Creates an empty file entry stamped with the given creation time
    pub fn new(name: impl Into<String>, created_on: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            metadata: String::new(),
            created_on,
            modified_on: created_on,
        }
    }

    /// Sets the metadata
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }
}

/// Result of reading a directory
///
/// Children are ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub info: DirectoryInfo,
    pub sub_directories: Vec<DirectoryInfo>,
    pub files: Vec<FileInfo>,
}

impl DirectoryListing {
    /// Creates a listing, sorting children by name
    pub fn new(
        info: DirectoryInfo,
        mut sub_directories: Vec<DirectoryInfo>,
        mut files: Vec<FileInfo>,
    ) -> Self {
        sub_directories.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            info,
            sub_directories,
            files,
        }
    }

    /// Looks up a child directory by name
    pub fn sub_directory(&self, name: &str) -> Option<&DirectoryInfo> {
        self.sub_directories.iter().find(|d| d.name == name)
    }

    /// Looks up a file by name
    pub fn file(&self, name: &str) -> Option<&FileInfo> {
        self.files.iter().find(|f| f.name == name)
    }
}
