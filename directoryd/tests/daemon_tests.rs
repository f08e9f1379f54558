//! Integration tests for the daemon runtime
//!
//! The runtime is fed request lines from memory and its output is collected
//! into a buffer.

use core_types::HandleKind;
use directoryd::{DaemonConfig, DaemonRuntime};
use serde_json::{json, Value};
use std::future;

fn lines(requests: &[Value]) -> Vec<u8> {
    let mut input = String::new();
    for request in requests {
        input.push_str(&request.to_string());
        input.push('\n');
    }
    input.into_bytes()
}

fn parse_output(output: Vec<u8>) -> Vec<Value> {
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn response<'a>(output: &'a [Value], id: &str) -> &'a Value {
    output
        .iter()
        .find(|line| line["id"] == id)
        .unwrap_or_else(|| panic!("no response for {}", id))
}

#[tokio::test]
async fn test_requests_are_answered() {
    let connect_id = "00000000-0000-4000-8000-000000000001";
    let unknown_id = "00000000-0000-4000-8000-000000000002";
    let unauthorised_id = "00000000-0000-4000-8000-000000000003";

    let input = lines(&[
        json!({"id": connect_id, "module": "connect", "action": "connect"}),
        json!({"id": unknown_id, "module": "ftp", "action": "get"}),
        json!({
            "id": unauthorised_id, "module": "nfs", "action": "get-directory",
            "params": {"rootPath": "app"}
        }),
    ]);
    let mut bytes = input.clone();
    bytes.extend_from_slice(b"\n{not json}\n");

    let runtime = DaemonRuntime::new(&DaemonConfig::default());
    let dispatcher = runtime.dispatcher();
    let output = runtime
        .run(bytes.as_slice(), Vec::new(), future::pending())
        .await
        .unwrap();
    let output = parse_output(output);

    assert_eq!(response(&output, connect_id)["status"], 200);
    assert_eq!(response(&output, connect_id)["data"]["state"], "connected");
    assert_eq!(response(&output, unknown_id)["description"], "Module not found");
    assert_eq!(response(&output, unauthorised_id)["status"], 401);

    let malformed = output
        .iter()
        .find(|line| {
            line["description"]
                .as_str()
                .is_some_and(|d| d.starts_with("Malformed request"))
        })
        .expect("malformed line answered");
    assert_eq!(malformed["status"], 400);

    let event = output
        .iter()
        .find(|line| line.get("event").is_some())
        .expect("connection event written");
    assert_eq!(event["event"]["kind"], "anonymous");
    assert_eq!(event["event"]["state"], "connected");

    let state = dispatcher.manager().state().await;
    assert!(!state.is_open(HandleKind::Anonymous));
}

#[tokio::test]
async fn test_shutdown_before_input() {
    let input = lines(&[json!({"module": "connect", "action": "connect"})]);

    let runtime = DaemonRuntime::new(&DaemonConfig::default());
    let dispatcher = runtime.dispatcher();
    let output = runtime
        .run(input.as_slice(), Vec::new(), future::ready(()))
        .await
        .unwrap();

    assert!(output.is_empty());
    assert!(!dispatcher.manager().state().await.is_open(HandleKind::Anonymous));
}

#[tokio::test]
async fn test_library_load_failure_is_reported() {
    let mut config = DaemonConfig::default();
    config.network.failed_library_loads = 1;

    let id = "00000000-0000-4000-8000-00000000000a";
    let input = lines(&[json!({"id": id, "module": "connect", "action": "connect"})]);

    let runtime = DaemonRuntime::new(&config);
    let output = runtime
        .run(input.as_slice(), Vec::new(), future::pending())
        .await
        .unwrap();
    let output = parse_output(output);

    assert_eq!(response(&output, id)["status"], 500);
    assert_eq!(response(&output, id)["errorCode"], -2);
    assert!(output
        .iter()
        .any(|line| line["event"]["state"] == "libraryLoadError"));
}
