//! The client handle manager

use crate::handle::{ClientHandle, HandleRequest, LibraryStatus, ManagerState};
use crate::ManagerError;
use connection_observer::ConnectionObserver;
use core_types::{ConnectionState, HandleKind};
use native_client::{LibraryLoader, NativeError, NativeLibrary};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info, instrument, warn};

struct ManagerInner {
    library: Option<Arc<dyn NativeLibrary>>,
    status: LibraryStatus,
    last_load_error: Option<NativeError>,
    anonymous: Option<ClientHandle>,
    authenticated: Option<ClientHandle>,
}

impl ManagerInner {
    fn slot(&mut self, kind: HandleKind) -> &mut Option<ClientHandle> {
        match kind {
            HandleKind::Anonymous => &mut self.anonymous,
            HandleKind::Authenticated => &mut self.authenticated,
        }
    }
}

/// Lifecycle owner of the native library and client handles
///
/// Construct one per process and share it through `Arc`.
pub struct ClientHandleManager {
    loader: Arc<dyn LibraryLoader>,
    observer: ConnectionObserver,
    inner: Mutex<ManagerInner>,
    /// Failed loads so far; read before waiting on `inner`
    load_failures: AtomicU64,
}

impl ClientHandleManager {
    /// Creates a manager; nothing is loaded until the first acquisition
    pub fn new(loader: Arc<dyn LibraryLoader>, observer: ConnectionObserver) -> Self {
        Self {
            loader,
            observer,
            inner: Mutex::new(ManagerInner {
                library: None,
                status: LibraryStatus::Uninitialized,
                last_load_error: None,
                anonymous: None,
                authenticated: None,
            }),
            load_failures: AtomicU64::new(0),
        }
    }

    /// The observer sessions report connection changes to
    pub fn observer(&self) -> &ConnectionObserver {
        &self.observer
    }

    /// Returns the cached handle of the requested kind, creating it if needed
    ///
    /// A caller that waited while another caller's library load failed gets
    /// that failure instead of retrying; the next fresh call retries.
    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    pub async fn acquire(&self, request: HandleRequest) -> Result<ClientHandle, ManagerError> {
        let failures_before = self.load_failures.load(Ordering::SeqCst);
        let mut inner = self.inner.lock().await;
        let kind = request.kind();

        if let Some(handle) = inner.slot(kind).clone() {
            return Ok(handle);
        }

        let library = self.ensure_library(&mut inner, failures_before).await?;
        let handle = self.create_handle(library, request).await?;
        *inner.slot(kind) = Some(handle.clone());
        Ok(handle)
    }

    /// Opens a fresh handle, replacing any cached one of the same kind
    ///
    /// The replaced session is closed only after the new one is open.
    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    pub async fn open(&self, request: HandleRequest) -> Result<ClientHandle, ManagerError> {
        let failures_before = self.load_failures.load(Ordering::SeqCst);
        let mut inner = self.inner.lock().await;
        let kind = request.kind();

        let library = self.ensure_library(&mut inner, failures_before).await?;
        let handle = self.create_handle(library, request).await?;

        if let Some(previous) = inner.slot(kind).replace(handle.clone()) {
            close_handle(previous).await;
        }
        Ok(handle)
    }

    /// The cached handle of `kind`, without creating one
    pub async fn cached(&self, kind: HandleKind) -> Option<ClientHandle> {
        self.inner.lock().await.slot(kind).clone()
    }

    /// Closes and forgets the cached handle of `kind`
    ///
    /// Returns false if nothing was cached.
    #[instrument(skip(self))]
    pub async fn release(&self, kind: HandleKind) -> bool {
        let handle = self.inner.lock().await.slot(kind).take();
        match handle {
            Some(handle) => {
                close_handle(handle).await;
                true
            }
            None => false,
        }
    }

    /// Releases every cached handle, authenticated first
    pub async fn shutdown(&self) {
        for kind in HandleKind::ALL {
            self.release(kind).await;
        }
        info!("Client handles released");
    }

    /// Current state snapshot
    pub async fn state(&self) -> ManagerState {
        let inner = self.inner.lock().await;
        ManagerState {
            library: inner.status,
            anonymous_open: inner.anonymous.is_some(),
            authenticated_open: inner.authenticated.is_some(),
        }
    }

    async fn ensure_library(
        &self,
        inner: &mut ManagerInner,
        failures_before: u64,
    ) -> Result<Arc<dyn NativeLibrary>, ManagerError> {
        if let Some(library) = &inner.library {
            return Ok(Arc::clone(library));
        }

        if self.load_failures.load(Ordering::SeqCst) > failures_before {
            if let Some(error) = &inner.last_load_error {
                return Err(ManagerError::LibraryLoad(error.clone()));
            }
        }

        let loader = Arc::clone(&self.loader);
        let loaded = task::spawn_blocking(move || {
            let library = loader.load()?;
            library.init_logging()?;
            Ok::<_, NativeError>(library)
        })
        .await?;

        match loaded {
            Ok(library) => {
                info!("Native library loaded");
                inner.library = Some(Arc::clone(&library));
                inner.status = LibraryStatus::Loaded;
                inner.last_load_error = None;
                Ok(library)
            }
            Err(error) => {
                warn!(%error, "Native library failed to load");
                inner.status = LibraryStatus::LoadError;
                inner.last_load_error = Some(error.clone());
                self.load_failures.fetch_add(1, Ordering::SeqCst);
                self.observer
                    .publish(HandleKind::Anonymous, ConnectionState::LibraryLoadError);
                Err(ManagerError::LibraryLoad(error))
            }
        }
    }

    async fn create_handle(
        &self,
        library: Arc<dyn NativeLibrary>,
        request: HandleRequest,
    ) -> Result<ClientHandle, ManagerError> {
        let kind = request.kind();
        let callback = self.observer.callback(kind);

        let session = task::spawn_blocking(move || match &request {
            HandleRequest::Anonymous => library.create_unregistered_client(callback),
            HandleRequest::Authenticated(credentials) => library.log_in(credentials, callback),
            HandleRequest::Register(credentials) => library.create_account(credentials, callback),
        })
        .await?
        .map_err(|error| {
            debug!(%kind, %error, "Native session refused");
            ManagerError::Session(error)
        })?;

        let handle = ClientHandle::new(kind, session);
        info!(%kind, handle = %handle.id(), "Client handle created");
        Ok(handle)
    }
}

async fn close_handle(handle: ClientHandle) {
    let id = handle.id();
    let kind = handle.kind();
    let session = Arc::clone(handle.session());
    if let Err(error) = task::spawn_blocking(move || session.close()).await {
        warn!(%kind, %error, "Closing native session did not complete");
    }
    info!(%kind, handle = %id, "Client handle released");
}
