//! Integration tests for the simulated native library
//!
//! These tests drive the library only through the `native_client` traits.

use core_types::ConnectionState;
use identity::{AppInfo, Credentials, SafeDriveKey};
use native_client::{
    CreateOptions, LibraryLoader, Namespace, NativeError, StateCallback, TransferMode,
};
use sim_network::{FaultPlan, NativeFault, SimNetwork, SimNetworkConfig};
use std::sync::{Arc, Mutex};

fn recorder() -> (StateCallback, Arc<Mutex<Vec<i32>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: StateCallback = Arc::new(move |code| sink.lock().unwrap().push(code));
    (callback, seen)
}

fn credentials() -> Credentials {
    Credentials::new("keyword", "1234", "password").expect("Failed to build credentials")
}

fn app() -> Namespace {
    Namespace::App(AppInfo::new("net.demo", "Demo", "Demo Vendor"))
}

fn path(raw: &str) -> Vec<String> {
    raw.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_failed_loads_then_success() {
    let network = SimNetwork::new(SimNetworkConfig {
        failed_library_loads: 1,
        ..Default::default()
    });

    assert!(matches!(network.load(), Err(NativeError::LibraryLoad(_))));
    assert!(network.load().is_ok());
    assert_eq!(network.load_attempts(), 2);
}

#[test]
fn test_session_reports_connected_on_open() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().expect("Failed to load library");
    let (observer, seen) = recorder();

    let _session = library
        .create_unregistered_client(observer)
        .expect("Failed to create session");

    assert_eq!(*seen.lock().unwrap(), vec![ConnectionState::CONNECTED_CODE]);
}

#[test]
fn test_broadcast_reaches_open_sessions_only() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().expect("Failed to load library");
    let (first_observer, first) = recorder();
    let (second_observer, second) = recorder();

    let kept = library.create_unregistered_client(first_observer).unwrap();
    let closed = library.create_account(&credentials(), second_observer).unwrap();
    closed.close();

    assert_eq!(network.broadcast(ConnectionState::Disconnected), 1);
    assert_eq!(first.lock().unwrap().last(), Some(&-1));
    assert_eq!(second.lock().unwrap().last(), Some(&0));
    drop(kept);
}

#[test]
fn test_login_requires_matching_password() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().unwrap();
    let (observer, _) = recorder();

    library.create_account(&credentials(), observer.clone()).unwrap();
    assert_eq!(network.account_count(), 1);
    assert!(matches!(
        library.create_account(&credentials(), observer.clone()),
        Err(NativeError::AccountExists)
    ));

    let wrong = Credentials::new("keyword", "1234", "other").unwrap();
    assert!(matches!(
        library.log_in(&wrong, observer.clone()),
        Err(NativeError::InvalidCredentials)
    ));
    assert!(library.log_in(&credentials(), observer).is_ok());
}

#[test]
fn test_account_storage_survives_sessions() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().unwrap();
    let (observer, _) = recorder();

    let first = library.create_account(&credentials(), observer.clone()).unwrap();
    first
        .create_directory(&app(), &path("kept"), &CreateOptions::default())
        .unwrap();
    first.close();

    let second = library.log_in(&credentials(), observer).unwrap();
    let listing = second.get_directory(&app(), &[]).unwrap();
    assert!(listing.sub_directory("kept").is_some());
    assert!(listing.info.name.to_lowercase().contains("root-dir"));
}

#[test]
fn test_namespace_permissions() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().unwrap();
    let (observer, _) = recorder();

    let anonymous = library.create_unregistered_client(observer.clone()).unwrap();
    assert_eq!(
        anonymous.get_directory(&app(), &[]).unwrap_err(),
        NativeError::PermissionDenied
    );

    let session = library.create_account(&credentials(), observer).unwrap();
    assert_eq!(
        session
            .create_directory(&Namespace::Drive(None), &path("a"), &CreateOptions::default())
            .unwrap_err(),
        NativeError::PermissionDenied
    );

    let drive = Namespace::Drive(Some(SafeDriveKey::new("grant")));
    session
        .create_directory(&drive, &path("a"), &CreateOptions::default())
        .unwrap();
    assert_eq!(session.get_directory(&drive, &[]).unwrap().info.name, "SAFEDrive");
}

#[test]
fn test_move_between_namespaces() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().unwrap();
    let (observer, _) = recorder();
    let session = library.create_account(&credentials(), observer).unwrap();
    let drive = Namespace::Drive(Some(SafeDriveKey::new("grant")));

    session
        .create_directory(&app(), &path("photos/2016"), &CreateOptions::default())
        .unwrap();
    session
        .transfer_directory(&app(), &path("photos"), &drive, &[], TransferMode::Move)
        .unwrap();

    assert!(session.get_directory(&app(), &path("photos")).is_err());
    assert!(session.get_directory(&drive, &path("photos/2016")).is_ok());
}

#[test]
fn test_file_writer_lifecycle() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().unwrap();
    let (observer, _) = recorder();
    let session = library.create_account(&credentials(), observer).unwrap();

    let writer = session.create_file(&app(), &path("notes.txt"), "").unwrap();
    session.write_file(writer, None, b"hello").unwrap();
    session.write_file(writer, Some(0), b"J").unwrap();
    session.close_file(writer).unwrap();

    assert_eq!(
        session.write_file(writer, None, b"late"),
        Err(NativeError::InvalidWriter)
    );

    let listing = session.get_directory(&app(), &[]).unwrap();
    assert_eq!(listing.file("notes.txt").map(|f| f.size), Some(5));

    let stats = session.stats().unwrap();
    assert_eq!(stats.posts_count, 1);
    assert_eq!(stats.puts_count, 1);
    assert_eq!(stats.gets_count, 1);
}

#[test]
fn test_write_offset_bounded_by_buffer() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().unwrap();
    let (observer, _) = recorder();
    let session = library.create_account(&credentials(), observer).unwrap();

    let writer = session.create_file(&app(), &path("data.bin"), "").unwrap();
    session.write_file(writer, None, b"ab").unwrap();

    for offset in [3, 1 << 61, u64::MAX] {
        let err = session.write_file(writer, Some(offset), b"x").unwrap_err();
        assert_eq!(err.code(), -1507);
    }
    session.write_file(writer, Some(2), b"c").unwrap();
    session.close_file(writer).unwrap();

    let listing = session.get_directory(&app(), &[]).unwrap();
    assert_eq!(listing.file("data.bin").map(|f| f.size), Some(3));
}

#[test]
fn test_injected_call_failure() {
    let plan = FaultPlan::new().with_fault(NativeFault::FailNextCalls {
        count: 1,
        error: NativeError::Other {
            code: -42,
            message: "network unreachable".to_string(),
        },
    });
    let network = SimNetwork::with_fault_plan(SimNetworkConfig::default(), plan);
    let library = network.load().unwrap();
    let (observer, _) = recorder();
    let session = library.create_account(&credentials(), observer).unwrap();

    let err = session.get_directory(&app(), &[]).unwrap_err();
    assert_eq!(err.code(), -42);
    assert!(session.get_directory(&app(), &[]).is_ok());
}

#[test]
fn test_closed_session_rejects_calls() {
    let network = SimNetwork::new(SimNetworkConfig::default());
    let library = network.load().unwrap();
    let (observer, _) = recorder();
    let session = library.create_account(&credentials(), observer).unwrap();

    session.close();
    assert_eq!(
        session.get_directory(&app(), &[]).unwrap_err(),
        NativeError::SessionClosed
    );
    assert!(network.open_sessions().is_empty());
}
