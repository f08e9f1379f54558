//! Path resolution logic
//!
//! This module handles parsing, normalizing and validating paths before any
//! operation reaches the native layer.

use core_types::RootKind;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during path resolution and request validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// A required field is absent
    #[error("{0} is missing")]
    MissingParameter(String),

    /// A field is present but has the wrong type or value
    #[error("Invalid request. {0} is not valid")]
    InvalidParameter(String),

    /// One of several required fields is absent
    #[error("REQUIRED_PARAMS_MISSING")]
    MissingParameters,

    /// Path is syntactically invalid or targets the root of a mutation
    #[error("INVALID_DIR_PATH")]
    InvalidPath(String),

    /// Delete was aimed at a namespace root
    #[error("CANNOT_DELETE_ROOT")]
    CannotDeleteRoot,
}

/// What an operation intends to do with a path
///
/// The same raw path is valid for some operations and not for others: the
/// root can be listed but never created, deleted or modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Listing a directory
    Read,
    /// Creating a directory (and missing parents)
    Create,
    /// Deleting a directory subtree
    Delete,
    /// Renaming or annotating a directory
    Modify,
    /// Source of a move or copy
    Source,
    /// Destination directory of a move or copy
    Destination,
}

/// A path that passed validation
///
/// Components are non-empty and free of `.`/`..`. An empty component list
/// denotes the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedPath {
    root: RootKind,
    components: Vec<String>,
}

impl ValidatedPath {
    /// Path denoting the root of a namespace
    pub fn root_of(root: RootKind) -> Self {
        Self {
            root,
            components: Vec::new(),
        }
    }

    /// The namespace this path is anchored at
    pub fn root(&self) -> RootKind {
        self.root
    }

    /// Validated components, outermost first
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Returns true if this path denotes the namespace root
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Final component, `None` for the root
    pub fn name(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// Components of the parent directory
    pub fn parent_components(&self) -> &[String] {
        match self.components.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }
}

impl fmt::Display for ValidatedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:/{}", self.root, self.components.join("/"))
    }
}

/// Path resolver
///
/// Handles splitting paths into components and applying the root rules.
pub struct PathResolver;

impl PathResolver {
    /// Splits a path into components
    ///
    /// Leading and trailing slashes are ignored, so `/`, `""` and `///` all
    /// normalize to the root (no components).
    ///
    /// # Examples
    ///
    /// ```
    /// use fs_view::PathResolver;
    ///
    /// let components = PathResolver::split_path("/docs/notes/").unwrap();
    /// assert_eq!(components, vec!["docs", "notes"]);
    ///
    /// assert!(PathResolver::split_path("/").unwrap().is_empty());
    /// ```
    pub fn split_path(path: &str) -> Result<Vec<&str>, PathError> {
        let path = path.trim_matches('/');

        if path.is_empty() {
            return Ok(Vec::new());
        }

        let components: Vec<&str> = path.split('/').collect();

        for component in &components {
            if component.is_empty() {
                return Err(PathError::InvalidPath(
                    "Path contains empty component".to_string(),
                ));
            }
            if *component == "." || *component == ".." {
                return Err(PathError::InvalidPath(
                    "Relative path components (. or ..) are not supported".to_string(),
                ));
            }
        }

        Ok(components)
    }

    /// Validates a raw path for the given kind of operation
    ///
    /// Rules, in order:
    /// - a missing path reads the root; it is an invalid target for create and
    ///   modify, deletes the root for delete, and is a missing parameter for
    ///   either side of a move or copy
    /// - create and modify may not target the root; delete of the root is
    ///   reported as [`PathError::CannotDeleteRoot`]
    /// - a move or copy may not use the root as its source
    pub fn resolve(
        root: RootKind,
        raw_path: Option<&str>,
        mutation: MutationKind,
    ) -> Result<ValidatedPath, PathError> {
        let raw_path = match raw_path {
            Some(path) if !path.is_empty() => path,
            _ => {
                return match mutation {
                    MutationKind::Read => Ok(ValidatedPath::root_of(root)),
                    MutationKind::Create | MutationKind::Modify => {
                        Err(PathError::InvalidPath("Path is missing".to_string()))
                    }
                    MutationKind::Delete => Err(PathError::CannotDeleteRoot),
                    MutationKind::Source | MutationKind::Destination => {
                        Err(PathError::MissingParameters)
                    }
                };
            }
        };

        let components: Vec<String> = Self::split_path(raw_path)?
            .into_iter()
            .map(str::to_string)
            .collect();
        let path = ValidatedPath { root, components };

        if path.is_root() {
            match mutation {
                MutationKind::Create | MutationKind::Modify | MutationKind::Source => {
                    return Err(PathError::InvalidPath(
                        "The root directory cannot be the target".to_string(),
                    ));
                }
                MutationKind::Delete => return Err(PathError::CannotDeleteRoot),
                MutationKind::Read | MutationKind::Destination => {}
            }
        }

        Ok(path)
    }

    /// Validates a single path component name
    ///
    /// Returns true if the name is valid for a directory entry.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\0')
    }
}
