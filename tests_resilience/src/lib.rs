//! Resilience Test Utilities
//!
//! This crate provides shared utilities for resilience and integration tests.
//!
//! ## Test Philosophy
//!
//! - **Safety under faults**: Invariants hold when the native library fails
//!   to load, slows down or rejects calls
//! - **Deterministic failures**: All faults are reproducible via FaultPlan
//! - **No handle leaks**: Concurrent callers share one session per kind, and
//!   shutdown leaves nothing open
//! - **Ordered teardown**: Writers are closed before their sessions

use connection_observer::{ConnectionEvents, ConnectionObserver};
use dispatcher::Dispatcher;
use identity::{AppInfo, AuthContext};
use ipc::RequestEnvelope;
use serde_json::{json, Value};
use services_directory::DirectoryService;
use session_manager::ClientHandleManager;
use sim_network::{FaultPlan, SimNetwork, SimNetworkConfig};
use std::sync::Arc;

/// Everything a test needs to drive the service
pub struct TestStack {
    pub network: SimNetwork,
    pub manager: Arc<ClientHandleManager>,
    pub dispatcher: Arc<Dispatcher>,
    pub events: ConnectionEvents,
}

/// Bootstrap helper for tests
///
/// Builds the full stack on a fresh simulated network.
pub fn test_stack(config: SimNetworkConfig) -> TestStack {
    test_stack_with_plan(config, FaultPlan::new())
}

/// Like [`test_stack`], with extra faults
pub fn test_stack_with_plan(config: SimNetworkConfig, plan: FaultPlan) -> TestStack {
    let network = SimNetwork::with_fault_plan(config, plan);
    test_stack_on(network)
}

/// Builds a fresh stack on an existing network
///
/// Accounts and their directories survive; sessions do not.
pub fn test_stack_on(network: SimNetwork) -> TestStack {
    let (observer, events) = ConnectionObserver::new();
    let manager = Arc::new(ClientHandleManager::new(Arc::new(network.clone()), observer));
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&manager),
        Arc::new(DirectoryService::new()),
        test_app(),
    ));

    TestStack {
        network,
        manager,
        dispatcher,
        events,
    }
}

pub fn test_app() -> AppInfo {
    AppInfo::new("net.maidsafe.resilience", "Resilience", "MaidSafe")
}

/// Credentials parameters shared by the tests
pub fn credentials() -> Value {
    json!({"keyword": "resilience", "pin": "0000", "password": "secret"})
}

/// An authorised `nfs` request
pub fn nfs(action: &str, params: Value) -> RequestEnvelope {
    RequestEnvelope::new("nfs", action)
        .with_auth(AuthContext::authorised(test_app()))
        .with_params(params)
}

/// An `auth` request carrying the shared credentials
pub fn auth(action: &str) -> RequestEnvelope {
    RequestEnvelope::new("auth", action).with_params(credentials())
}
