//! Message types and envelope structure

use core_types::RequestId;
use identity::AuthContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP-style status code carried by a response
pub type Status = u16;

/// Inbound request envelope
///
/// Transport has already deserialized the request; routing happens on
/// `module` and `action`, everything else is in `params`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    /// Correlates the response with this request
    #[serde(default)]
    pub id: RequestId,
    pub module: String,
    pub action: String,
    /// Caller authorization, unauthorised when absent
    #[serde(default)]
    pub auth: AuthContext,
    /// Operation parameters (`rootPath`, `path`, `metadata`, ...)
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl RequestEnvelope {
    /// Creates an unauthorised request with no parameters
    pub fn new(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            module: module.into(),
            action: action.into(),
            auth: AuthContext::unauthorised(),
            params: Map::new(),
        }
    }

    /// Sets the authorization context
    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = auth;
        self
    }

    /// Sets a single parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces all parameters
    ///
    /// Non-object values are ignored.
    pub fn with_params(mut self, params: Value) -> Self {
        if let Value::Object(map) = params {
            self.params = map;
        }
        self
    }
}

/// Outcome part of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Failure {
        #[serde(rename = "errorCode")]
        error_code: i64,
        description: String,
    },
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

/// Response to a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: RequestId,
    pub status: Status,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl Response {
    /// Success with no body
    pub fn ok(id: RequestId) -> Self {
        Self {
            id,
            status: 200,
            body: ResponseBody::Success { data: None },
        }
    }

    /// Success carrying data
    pub fn with_data(id: RequestId, data: Value) -> Self {
        Self {
            id,
            status: 200,
            body: ResponseBody::Success { data: Some(data) },
        }
    }

    /// Failure
    pub fn failure(
        id: RequestId,
        status: Status,
        error_code: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            status,
            body: ResponseBody::Failure {
                error_code,
                description: description.into(),
            },
        }
    }

    /// Returns true for a success response
    pub fn is_success(&self) -> bool {
        matches!(self.body, ResponseBody::Success { .. })
    }

    /// Data of a success response
    pub fn data(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Success { data } => data.as_ref(),
            ResponseBody::Failure { .. } => None,
        }
    }

    /// Error code of a failure response
    pub fn error_code(&self) -> Option<i64> {
        match &self.body {
            ResponseBody::Failure { error_code, .. } => Some(*error_code),
            ResponseBody::Success { .. } => None,
        }
    }

    /// Description of a failure response
    pub fn description(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Failure { description, .. } => Some(description),
            ResponseBody::Success { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_defaults() {
        let envelope: RequestEnvelope =
            serde_json::from_value(json!({"module": "nfs", "action": "get-directory"})).unwrap();

        assert_eq!(envelope.module, "nfs");
        assert!(!envelope.auth.is_authorised);
        assert!(envelope.params.is_empty());
    }

    #[test]
    fn test_envelope_builder() {
        let envelope = RequestEnvelope::new("nfs", "create-directory")
            .with_param("rootPath", "app")
            .with_param("isPrivate", true);

        assert_eq!(envelope.params["rootPath"], "app");
        assert_eq!(envelope.params["isPrivate"], true);

        let envelope = envelope.with_params(json!({"path": "/a"}));
        assert_eq!(envelope.params.len(), 1);
    }

    #[test]
    fn test_success_wire_format() {
        let id = RequestId::new();
        let json = serde_json::to_value(Response::ok(id)).unwrap();
        assert_eq!(json["status"], 200);
        assert!(json.get("data").is_none());
        assert!(json.get("errorCode").is_none());

        let json = serde_json::to_value(Response::with_data(id, json!({"a": 1}))).unwrap();
        assert_eq!(json["data"]["a"], 1);
    }

    #[test]
    fn test_failure_wire_format() {
        let id = RequestId::new();
        let response = Response::failure(id, 401, 401, "UNAUTHORISED");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], json!(id.as_uuid()));
        assert_eq!(json["status"], 401);
        assert_eq!(json["errorCode"], 401);
        assert_eq!(json["description"], "UNAUTHORISED");

        let parsed: Response = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, response);
        assert!(!parsed.is_success());
        assert_eq!(parsed.error_code(), Some(401));
    }
}
