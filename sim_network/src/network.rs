//! Simulated network and library

use crate::config::SimNetworkConfig;
use crate::fault_injection::{FaultInjector, FaultPlan};
use crate::lock;
use crate::session::{Account, SimSession};
use crate::tree::DirectoryTree;
use core_types::{ConnectionState, HandleKind};
use identity::Credentials;
use native_client::{LibraryLoader, NativeError, NativeLibrary, NativeSession, StateCallback};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info, warn};

struct NetworkState {
    config: SimNetworkConfig,
    faults: Arc<Mutex<FaultInjector>>,
    accounts: Mutex<HashMap<String, Arc<Account>>>,
    sessions: Mutex<Vec<Weak<SimSession>>>,
    load_attempts: AtomicUsize,
}

/// In-memory storage network
///
/// Cloning shares the network. It doubles as the [`LibraryLoader`] for the
/// simulated library, and exposes what tests need to inspect it.
#[derive(Clone)]
pub struct SimNetwork {
    inner: Arc<NetworkState>,
}

impl SimNetwork {
    /// Creates a network with the faults implied by `config`
    pub fn new(config: SimNetworkConfig) -> Self {
        Self::with_fault_plan(config, FaultPlan::new())
    }

    /// Creates a network with extra faults on top of those implied by `config`
    pub fn with_fault_plan(config: SimNetworkConfig, plan: FaultPlan) -> Self {
        let plan = plan
            .faults()
            .iter()
            .cloned()
            .fold(config.fault_plan(), FaultPlan::with_fault);

        Self {
            inner: Arc::new(NetworkState {
                config,
                faults: Arc::new(Mutex::new(FaultInjector::new(plan))),
                accounts: Mutex::new(HashMap::new()),
                sessions: Mutex::new(Vec::new()),
                load_attempts: AtomicUsize::new(0),
            }),
        }
    }

    /// Number of times a load was attempted
    pub fn load_attempts(&self) -> usize {
        self.inner.load_attempts.load(Ordering::SeqCst)
    }

    /// Number of registered accounts
    pub fn account_count(&self) -> usize {
        lock(&self.inner.accounts).len()
    }

    /// Sessions that were opened and not yet closed
    pub fn open_sessions(&self) -> Vec<Arc<SimSession>> {
        let mut sessions = lock(&self.inner.sessions);
        sessions.retain(|session| session.strong_count() > 0);
        sessions
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|session| !session.is_closed())
            .collect()
    }

    /// Pushes a connection state to every open session's observer
    ///
    /// Returns the number of sessions notified.
    pub fn broadcast(&self, state: ConnectionState) -> usize {
        let sessions = self.open_sessions();
        for session in &sessions {
            session.notify(state.code());
        }
        debug!(%state, sessions = sessions.len(), "Simulated connection change");
        sessions.len()
    }

    fn open_session(
        &self,
        kind: HandleKind,
        account: Option<Arc<Account>>,
        observer: StateCallback,
    ) -> Arc<dyn NativeSession> {
        let session = Arc::new(SimSession::new(
            kind,
            account,
            Arc::clone(&self.inner.faults),
            observer,
        ));
        lock(&self.inner.sessions).push(Arc::downgrade(&session));
        session.notify(ConnectionState::Connected.code());
        session
    }
}

impl LibraryLoader for SimNetwork {
    fn load(&self) -> Result<Arc<dyn NativeLibrary>, NativeError> {
        let attempt = self.inner.load_attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if lock(&self.inner.faults).should_fail_load() {
            warn!(attempt, "Simulated library load failure");
            return Err(NativeError::LibraryLoad(
                "simulated library could not be loaded".to_string(),
            ));
        }

        info!(attempt, "Simulated library loaded");
        Ok(Arc::new(SimLibrary {
            network: self.clone(),
        }))
    }
}

/// The simulated native library
struct SimLibrary {
    network: SimNetwork,
}

impl NativeLibrary for SimLibrary {
    fn init_logging(&self) -> Result<(), NativeError> {
        if lock(&self.network.inner.faults).should_fail_init() {
            return Err(NativeError::LibraryLoad(
                "native logging could not be initialized".to_string(),
            ));
        }
        Ok(())
    }

    fn create_unregistered_client(
        &self,
        observer: StateCallback,
    ) -> Result<Arc<dyn NativeSession>, NativeError> {
        Ok(self
            .network
            .open_session(HandleKind::Anonymous, None, observer))
    }

    fn log_in(
        &self,
        credentials: &Credentials,
        observer: StateCallback,
    ) -> Result<Arc<dyn NativeSession>, NativeError> {
        credentials
            .validate()
            .map_err(|_| NativeError::InvalidCredentials)?;

        let account = lock(&self.network.inner.accounts)
            .get(&credentials.account_locator())
            .cloned()
            .filter(|account| account.password_digest == credentials.password_digest())
            .ok_or(NativeError::InvalidCredentials)?;

        Ok(self
            .network
            .open_session(HandleKind::Authenticated, Some(account), observer))
    }

    fn create_account(
        &self,
        credentials: &Credentials,
        observer: StateCallback,
    ) -> Result<Arc<dyn NativeSession>, NativeError> {
        credentials
            .validate()
            .map_err(|_| NativeError::InvalidCredentials)?;

        let account = {
            let mut accounts = lock(&self.network.inner.accounts);
            let locator = credentials.account_locator();
            if accounts.contains_key(&locator) {
                return Err(NativeError::AccountExists);
            }

            let account = Arc::new(Account {
                password_digest: credentials.password_digest(),
                tree: Mutex::new(DirectoryTree::new(
                    self.network.inner.config.versioned_directories,
                )),
            });
            accounts.insert(locator, Arc::clone(&account));
            account
        };

        info!("Simulated account created");
        Ok(self
            .network
            .open_session(HandleKind::Authenticated, Some(account), observer))
    }
}
