//! # Service Contract Tests
//!
//! This crate provides "golden" tests for the directory service contract to
//! ensure it doesn't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: The wire contract is written down as code
//! - **Testability first**: Contract tests fail when interfaces change
//! - **Mechanism not policy**: Define what must be stable, not how to use it
//!
//! ## Structure
//!
//! - `routing`: module and action identifiers
//! - `wire`: field names of envelopes, responses and payloads
//! - `errors`: status, error code and description of every failure kind

pub mod errors;
pub mod routing;
pub mod wire;

/// Common test helpers for contract validation
pub mod test_helpers {
    use ipc::Response;
    use serde::Serialize;
    use serde_json::Value;

    /// Serializes a value and returns its top-level field names, sorted
    pub fn field_names<T: Serialize>(value: &T) -> Vec<String> {
        match serde_json::to_value(value).expect("Failed to serialize value") {
            Value::Object(map) => {
                let mut names: Vec<String> = map.keys().cloned().collect();
                names.sort();
                names
            }
            other => panic!("Expected an object, got {}", other),
        }
    }

    /// Verifies a failure response against the expected triple
    pub fn verify_failure_contract(
        response: &Response,
        expected_status: u16,
        expected_code: i64,
        expected_description: &str,
    ) {
        assert_eq!(
            response.status, expected_status,
            "Status changed: expected {}, got {}",
            expected_status, response.status
        );
        assert_eq!(
            response.error_code(),
            Some(expected_code),
            "Error code changed: expected {}, got {:?}",
            expected_code,
            response.error_code()
        );
        assert_eq!(
            response.description(),
            Some(expected_description),
            "Description changed: expected '{}', got {:?}",
            expected_description,
            response.description()
        );
    }
}
