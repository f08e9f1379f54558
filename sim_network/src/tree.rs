//! In-memory directory arena
//!
//! All namespaces of one account live in a single arena so that a move
//! between the app root and the drive is a re-link, not a copy.

use chrono::{DateTime, Utc};
use fs_view::{DirectoryInfo, DirectoryListing, FileInfo};
use native_client::{CreateOptions, DirectoryChange, DirectoryId, NativeError, TransferMode};
use std::collections::{BTreeMap, HashMap};

/// Name of the shared drive root
pub const DRIVE_ROOT_NAME: &str = "SAFEDrive";

/// Identifies a namespace root inside an account
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RootKey {
    /// Root of one application, keyed by application id
    App(String),
    Drive,
}

#[derive(Debug, Clone)]
struct StoredFile {
    info: FileInfo,
    content: Vec<u8>,
}

#[derive(Debug, Clone)]
struct DirectoryNode {
    info: DirectoryInfo,
    parent: Option<DirectoryId>,
    children: BTreeMap<String, DirectoryId>,
    files: BTreeMap<String, StoredFile>,
}

impl DirectoryNode {
    fn new(info: DirectoryInfo, parent: Option<DirectoryId>) -> Self {
        Self {
            info,
            parent,
            children: BTreeMap::new(),
            files: BTreeMap::new(),
        }
    }
}

/// Directory arena of one account
///
/// Roots are created lazily the first time they are addressed.
#[derive(Debug, Default)]
pub struct DirectoryTree {
    nodes: HashMap<DirectoryId, DirectoryNode>,
    roots: HashMap<RootKey, DirectoryId>,
    versioned: bool,
}

impl DirectoryTree {
    /// Creates an empty arena
    ///
    /// `versioned` is reported on every directory created in it.
    pub fn new(versioned: bool) -> Self {
        Self {
            nodes: HashMap::new(),
            roots: HashMap::new(),
            versioned,
        }
    }

    /// Returns the root for `key`, creating it on first use
    pub fn root(&mut self, key: RootKey, name: &str, now: DateTime<Utc>) -> DirectoryId {
        if let Some(id) = self.roots.get(&key) {
            return *id;
        }

        let id = DirectoryId::new();
        let info = DirectoryInfo::new(name, now).with_versioned(self.versioned);
        self.nodes.insert(id, DirectoryNode::new(info, None));
        self.roots.insert(key, id);
        id
    }

    /// Number of directories, roots included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: DirectoryId) -> Result<&DirectoryNode, NativeError> {
        self.nodes.get(&id).ok_or(NativeError::DirectoryNotFound)
    }

    fn node_mut(&mut self, id: DirectoryId) -> Result<&mut DirectoryNode, NativeError> {
        self.nodes.get_mut(&id).ok_or(NativeError::DirectoryNotFound)
    }

    /// Walks `path` down from `start`
    pub fn lookup(&self, start: DirectoryId, path: &[String]) -> Result<DirectoryId, NativeError> {
        let mut current = start;
        for component in path {
            current = *self
                .node(current)?
                .children
                .get(component)
                .ok_or(NativeError::DirectoryNotFound)?;
        }
        Ok(current)
    }

    fn attach_new(
        &mut self,
        parent: DirectoryId,
        info: DirectoryInfo,
        now: DateTime<Utc>,
    ) -> Result<DirectoryId, NativeError> {
        let id = DirectoryId::new();
        let parent_node = self.node_mut(parent)?;
        parent_node.children.insert(info.name.clone(), id);
        parent_node.info.touch(now);
        self.nodes.insert(id, DirectoryNode::new(info, Some(parent)));
        Ok(id)
    }

    /// Creates the directory at `path` and any missing parents
    pub fn create(
        &mut self,
        root: DirectoryId,
        path: &[String],
        options: &CreateOptions,
        now: DateTime<Utc>,
    ) -> Result<DirectoryId, NativeError> {
        let (name, parents) = path
            .split_last()
            .ok_or(NativeError::DirectoryAlreadyExists)?;

        let mut current = root;
        for component in parents {
            let existing = self.node(current)?.children.get(component).copied();
            current = match existing {
                Some(id) => id,
                None => {
                    let info = DirectoryInfo::new(component.clone(), now)
                        .with_versioned(self.versioned);
                    self.attach_new(current, info, now)?
                }
            };
        }

        if self.node(current)?.children.contains_key(name) {
            return Err(NativeError::DirectoryAlreadyExists);
        }

        let info = DirectoryInfo::new(name.clone(), now)
            .with_metadata(options.metadata.clone())
            .with_private(options.is_private)
            .with_versioned(self.versioned);
        self.attach_new(current, info, now)
    }

    /// Lists a directory, children ordered by name
    pub fn listing(&self, id: DirectoryId) -> Result<DirectoryListing, NativeError> {
        let node = self.node(id)?;
        let sub_directories = node
            .children
            .values()
            .filter_map(|child| self.nodes.get(child))
            .map(|child| child.info.clone())
            .collect();
        let files = node.files.values().map(|file| file.info.clone()).collect();
        Ok(DirectoryListing::new(node.info.clone(), sub_directories, files))
    }

    /// Returns true if `ancestor` is `id` or one of its parents
    pub fn is_ancestor(&self, ancestor: DirectoryId, id: DirectoryId) -> bool {
        let mut current = Some(id);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.nodes.get(&candidate).and_then(|node| node.parent);
        }
        false
    }

    fn remove_subtree(&mut self, id: DirectoryId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children.into_values());
            }
        }
    }

    /// Deletes the directory at `path` with everything below it
    pub fn delete(
        &mut self,
        root: DirectoryId,
        path: &[String],
        now: DateTime<Utc>,
    ) -> Result<(), NativeError> {
        let id = self.lookup(root, path)?;
        let node = self.node(id)?;
        let parent = node.parent.ok_or(NativeError::PermissionDenied)?;
        let name = node.info.name.clone();

        let parent_node = self.node_mut(parent)?;
        parent_node.children.remove(&name);
        parent_node.info.touch(now);
        self.remove_subtree(id);
        Ok(())
    }

    /// Applies a rename and/or metadata update
    pub fn modify(
        &mut self,
        root: DirectoryId,
        path: &[String],
        change: &DirectoryChange,
        now: DateTime<Utc>,
    ) -> Result<(), NativeError> {
        let id = self.lookup(root, path)?;
        let node = self.node(id)?;
        let old_name = node.info.name.clone();

        if let Some(new_name) = change.name.as_ref().filter(|name| **name != old_name) {
            let parent = node.parent.ok_or(NativeError::PermissionDenied)?;
            let parent_node = self.node_mut(parent)?;
            if parent_node.children.contains_key(new_name) {
                return Err(NativeError::DirectoryAlreadyExists);
            }
            parent_node.children.remove(&old_name);
            parent_node.children.insert(new_name.clone(), id);
            parent_node.info.touch(now);
        }

        let node = self.node_mut(id)?;
        if let Some(name) = &change.name {
            node.info.name = name.clone();
        }
        if let Some(metadata) = &change.metadata {
            node.info.metadata = metadata.clone();
        }
        node.info.touch(now);
        Ok(())
    }

    fn copy_subtree(
        &mut self,
        source: DirectoryId,
        new_parent: DirectoryId,
        now: DateTime<Utc>,
    ) -> Result<DirectoryId, NativeError> {
        let original = self.node(source)?.clone();
        let new_id = DirectoryId::new();

        let mut info = original.info.clone();
        info.created_on = now;
        info.modified_on = now;
        let mut copy = DirectoryNode::new(info, Some(new_parent));
        copy.files = original.files.clone();
        self.nodes.insert(new_id, copy);

        for (name, child) in original.children {
            let child_copy = self.copy_subtree(child, new_id, now)?;
            self.node_mut(new_id)?.children.insert(name, child_copy);
        }

        Ok(new_id)
    }

    /// Moves or copies `src_path` to become a child of `dest_path`
    ///
    /// The source is resolved before the destination.
    pub fn transfer(
        &mut self,
        src_root: DirectoryId,
        src_path: &[String],
        dest_root: DirectoryId,
        dest_path: &[String],
        mode: TransferMode,
        now: DateTime<Utc>,
    ) -> Result<(), NativeError> {
        let source = self.lookup(src_root, src_path)?;
        let dest = self.lookup(dest_root, dest_path)?;

        let source_node = self.node(source)?;
        let old_parent = source_node.parent.ok_or(NativeError::InvalidDestination)?;
        let name = source_node.info.name.clone();

        if self.is_ancestor(source, dest) {
            return Err(NativeError::InvalidDestination);
        }
        if self.node(dest)?.children.contains_key(&name) {
            return Err(NativeError::DirectoryAlreadyExists);
        }

        let moved = match mode {
            TransferMode::Move => {
                let parent_node = self.node_mut(old_parent)?;
                parent_node.children.remove(&name);
                parent_node.info.touch(now);

                let node = self.node_mut(source)?;
                node.parent = Some(dest);
                node.info.touch(now);
                source
            }
            TransferMode::Copy => self.copy_subtree(source, dest, now)?,
        };

        let dest_node = self.node_mut(dest)?;
        dest_node.children.insert(name, moved);
        dest_node.info.touch(now);
        Ok(())
    }

    /// Adds an empty file entry
    ///
    /// Returns the parent directory and file name for later commits.
    pub fn create_file(
        &mut self,
        root: DirectoryId,
        path: &[String],
        metadata: &str,
        now: DateTime<Utc>,
    ) -> Result<(DirectoryId, String), NativeError> {
        let (name, parents) = path.split_last().ok_or(NativeError::FileNotFound)?;
        let parent = self.lookup(root, parents)?;
        let parent_node = self.node_mut(parent)?;

        if parent_node.files.contains_key(name) {
            return Err(NativeError::FileAlreadyExists);
        }

        parent_node.files.insert(
            name.clone(),
            StoredFile {
                info: FileInfo::new(name.clone(), now).with_metadata(metadata),
                content: Vec::new(),
            },
        );
        parent_node.info.touch(now);
        Ok((parent, name.clone()))
    }

    /// Replaces a file's content
    pub fn commit_file(
        &mut self,
        parent: DirectoryId,
        name: &str,
        content: Vec<u8>,
        now: DateTime<Utc>,
    ) -> Result<(), NativeError> {
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or(NativeError::FileNotFound)?;
        let file = parent_node
            .files
            .get_mut(name)
            .ok_or(NativeError::FileNotFound)?;

        file.info.size = content.len() as u64;
        file.content = content;
        if now > file.info.modified_on {
            file.info.modified_on = now;
        }
        parent_node.info.touch(now);
        Ok(())
    }

    /// Committed content of a file
    pub fn file_content(&self, parent: DirectoryId, name: &str) -> Option<&[u8]> {
        self.nodes
            .get(&parent)?
            .files
            .get(name)
            .map(|file| file.content.as_slice())
    }
}
