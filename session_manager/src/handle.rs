//! Client handles and manager state

use core_types::{HandleId, HandleKind};
use identity::Credentials;
use native_client::NativeSession;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What a caller asks the manager for
#[derive(Debug, Clone)]
pub enum HandleRequest {
    /// A session not bound to any account
    Anonymous,
    /// A session for an existing account
    Authenticated(Credentials),
    /// A session for a new account, created on the way
    Register(Credentials),
}

impl HandleRequest {
    /// Kind of handle the request yields
    pub fn kind(&self) -> HandleKind {
        match self {
            HandleRequest::Anonymous => HandleKind::Anonymous,
            HandleRequest::Authenticated(_) | HandleRequest::Register(_) => {
                HandleKind::Authenticated
            }
        }
    }
}

/// An open native session, lent out by the manager
///
/// Clones share the session. Dropping a clone does not close it; only the
/// manager does that.
#[derive(Clone)]
pub struct ClientHandle {
    id: HandleId,
    kind: HandleKind,
    session: Arc<dyn NativeSession>,
}

impl ClientHandle {
    pub(crate) fn new(kind: HandleKind, session: Arc<dyn NativeSession>) -> Self {
        Self {
            id: HandleId::new(),
            kind,
            session,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// The underlying native session
    pub fn session(&self) -> &Arc<dyn NativeSession> {
        &self.session
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Load state of the native library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LibraryStatus {
    Uninitialized,
    Loaded,
    /// The last load failed; the next acquisition retries
    LoadError,
}

/// Snapshot of the manager's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerState {
    pub library: LibraryStatus,
    pub anonymous_open: bool,
    pub authenticated_open: bool,
}

impl ManagerState {
    /// Returns true if a handle of `kind` is cached
    pub fn is_open(&self, kind: HandleKind) -> bool {
        match kind {
            HandleKind::Anonymous => self.anonymous_open,
            HandleKind::Authenticated => self.authenticated_open,
        }
    }
}

impl fmt::Display for ManagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.library, self.anonymous_open, self.authenticated_open) {
            (LibraryStatus::Uninitialized, ..) => write!(f, "Uninitialized"),
            (LibraryStatus::LoadError, ..) => write!(f, "LibraryLoadError"),
            (LibraryStatus::Loaded, false, false) => write!(f, "LibraryLoaded"),
            (LibraryStatus::Loaded, true, false) => write!(f, "AnonymousOpen"),
            (LibraryStatus::Loaded, false, true) => write!(f, "AuthenticatedOpen"),
            (LibraryStatus::Loaded, true, true) => write!(f, "AnonymousOpen+AuthenticatedOpen"),
        }
    }
}
