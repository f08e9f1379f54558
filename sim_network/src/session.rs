//! Simulated native session

use crate::fault_injection::FaultInjector;
use crate::lock;
use crate::tree::{DirectoryTree, RootKey, DRIVE_ROOT_NAME};
use chrono::Utc;
use core_types::HandleKind;
use fs_view::DirectoryListing;
use native_client::{
    ClientStats, CreateOptions, DirectoryChange, DirectoryId, Namespace, NativeError,
    NativeSession, StateCallback, TransferMode, WriterId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A registered account
#[derive(Debug)]
pub(crate) struct Account {
    pub(crate) password_digest: String,
    pub(crate) tree: Mutex<DirectoryTree>,
}

#[derive(Debug)]
struct OpenWriter {
    parent: DirectoryId,
    name: String,
    buffer: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
enum Counter {
    Get,
    Put,
    Post,
    Delete,
}

/// Simulated session
///
/// A session opened by login or registration is bound to an account and can
/// use its namespaces. An unregistered session has no namespaces; every
/// namespace call fails with [`NativeError::PermissionDenied`].
pub struct SimSession {
    kind: HandleKind,
    account: Option<Arc<Account>>,
    faults: Arc<Mutex<FaultInjector>>,
    observer: Mutex<Option<StateCallback>>,
    closed: AtomicBool,
    writers: Mutex<HashMap<WriterId, OpenWriter>>,
    stats: Mutex<ClientStats>,
}

impl SimSession {
    pub(crate) fn new(
        kind: HandleKind,
        account: Option<Arc<Account>>,
        faults: Arc<Mutex<FaultInjector>>,
        observer: StateCallback,
    ) -> Self {
        Self {
            kind,
            account,
            faults,
            observer: Mutex::new(Some(observer)),
            closed: AtomicBool::new(false),
            writers: Mutex::new(HashMap::new()),
            stats: Mutex::new(ClientStats::default()),
        }
    }

    /// Kind of handle this session was opened as
    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of writers not yet closed
    pub fn open_writers(&self) -> usize {
        lock(&self.writers).len()
    }

    /// Reports a connection state through the attached observer
    ///
    /// Does nothing once the session is closed.
    pub(crate) fn notify(&self, code: i32) {
        let observer = lock(&self.observer).clone();
        if let Some(observer) = observer {
            observer(code);
        }
    }

    fn begin(&self, counter: Counter) -> Result<(), NativeError> {
        if self.is_closed() {
            return Err(NativeError::SessionClosed);
        }

        let (latency, failure) = {
            let mut faults = lock(&self.faults);
            (faults.latency(), faults.next_call_failure())
        };
        if let Some(latency) = latency {
            std::thread::sleep(latency);
        }

        {
            let mut stats = lock(&self.stats);
            match counter {
                Counter::Get => stats.gets_count += 1,
                Counter::Put => stats.puts_count += 1,
                Counter::Post => stats.posts_count += 1,
                Counter::Delete => stats.deletes_count += 1,
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn tree(&self) -> Result<MutexGuard<'_, DirectoryTree>, NativeError> {
        let account = self.account.as_ref().ok_or(NativeError::PermissionDenied)?;
        Ok(lock(&account.tree))
    }
}

fn invalid_offset() -> NativeError {
    NativeError::Other {
        code: -1507,
        message: "FfiError::InvalidOffset".to_string(),
    }
}

fn root_of(tree: &mut DirectoryTree, namespace: &Namespace) -> Result<DirectoryId, NativeError> {
    let now = Utc::now();
    match namespace {
        Namespace::App(app) => Ok(tree.root(RootKey::App(app.id.clone()), &app.root_dir_name(), now)),
        Namespace::Drive(Some(_)) => Ok(tree.root(RootKey::Drive, DRIVE_ROOT_NAME, now)),
        Namespace::Drive(None) => Err(NativeError::PermissionDenied),
    }
}

impl NativeSession for SimSession {
    fn create_directory(
        &self,
        namespace: &Namespace,
        path: &[String],
        options: &CreateOptions,
    ) -> Result<(), NativeError> {
        self.begin(Counter::Post)?;
        let mut tree = self.tree()?;
        let root = root_of(&mut tree, namespace)?;
        tree.create(root, path, options, Utc::now())?;
        debug!(root = %namespace.root_kind(), depth = path.len(), "Simulated directory created");
        Ok(())
    }

    fn get_directory(
        &self,
        namespace: &Namespace,
        path: &[String],
    ) -> Result<DirectoryListing, NativeError> {
        self.begin(Counter::Get)?;
        let mut tree = self.tree()?;
        let root = root_of(&mut tree, namespace)?;
        let id = tree.lookup(root, path)?;
        tree.listing(id)
    }

    fn delete_directory(&self, namespace: &Namespace, path: &[String]) -> Result<(), NativeError> {
        self.begin(Counter::Delete)?;
        let mut tree = self.tree()?;
        let root = root_of(&mut tree, namespace)?;
        tree.delete(root, path, Utc::now())
    }

    fn modify_directory(
        &self,
        namespace: &Namespace,
        path: &[String],
        change: &DirectoryChange,
    ) -> Result<(), NativeError> {
        self.begin(Counter::Put)?;
        let mut tree = self.tree()?;
        let root = root_of(&mut tree, namespace)?;
        tree.modify(root, path, change, Utc::now())
    }

    fn transfer_directory(
        &self,
        src: &Namespace,
        src_path: &[String],
        dest: &Namespace,
        dest_path: &[String],
        mode: TransferMode,
    ) -> Result<(), NativeError> {
        self.begin(Counter::Put)?;
        let mut tree = self.tree()?;
        let src_root = root_of(&mut tree, src)?;
        let dest_root = root_of(&mut tree, dest)?;
        tree.transfer(src_root, src_path, dest_root, dest_path, mode, Utc::now())
    }

    fn create_file(
        &self,
        namespace: &Namespace,
        path: &[String],
        metadata: &str,
    ) -> Result<WriterId, NativeError> {
        self.begin(Counter::Post)?;
        let (parent, name) = {
            let mut tree = self.tree()?;
            let root = root_of(&mut tree, namespace)?;
            tree.create_file(root, path, metadata, Utc::now())?
        };

        let writer = WriterId::new();
        lock(&self.writers).insert(
            writer,
            OpenWriter {
                parent,
                name,
                buffer: Vec::new(),
            },
        );
        debug!(%writer, "Simulated writer opened");
        Ok(writer)
    }

    fn write_file(
        &self,
        writer: WriterId,
        offset: Option<u64>,
        content: &[u8],
    ) -> Result<(), NativeError> {
        if self.is_closed() {
            return Err(NativeError::SessionClosed);
        }

        let mut writers = lock(&self.writers);
        let open = writers.get_mut(&writer).ok_or(NativeError::InvalidWriter)?;
        let start = match offset {
            Some(offset) => usize::try_from(offset)
                .ok()
                .filter(|start| *start <= open.buffer.len())
                .ok_or_else(invalid_offset)?,
            None => open.buffer.len(),
        };

        // Writes may extend the buffer but never leave a gap
        let end = start.checked_add(content.len()).ok_or_else(invalid_offset)?;
        if open.buffer.len() < end {
            open.buffer.resize(end, 0);
        }
        open.buffer[start..end].copy_from_slice(content);
        Ok(())
    }

    fn close_file(&self, writer: WriterId) -> Result<(), NativeError> {
        let open = lock(&self.writers)
            .remove(&writer)
            .ok_or(NativeError::InvalidWriter)?;
        self.begin(Counter::Put)?;

        let mut tree = self.tree()?;
        tree.commit_file(open.parent, &open.name, open.buffer, Utc::now())?;
        debug!(%writer, "Simulated writer committed");
        Ok(())
    }

    fn stats(&self) -> Result<ClientStats, NativeError> {
        if self.is_closed() {
            return Err(NativeError::SessionClosed);
        }
        Ok(*lock(&self.stats))
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        lock(&self.observer).take();
        let dropped = lock(&self.writers).drain().count();
        debug!(kind = %self.kind, dropped_writers = dropped, "Simulated session closed");
    }
}
