//! Typed access to request parameters
//!
//! Parameters arrive as a JSON object. Absent and `null` fields are treated
//! the same; a present field of the wrong type is reported by name.

use crate::path::PathError;
use core_types::RootKind;
use serde_json::{Map, Value};

/// Read-only view over a request's parameter object
#[derive(Debug, Clone, Copy)]
pub struct RequestFields<'a> {
    params: &'a Map<String, Value>,
}

impl<'a> RequestFields<'a> {
    pub fn new(params: &'a Map<String, Value>) -> Self {
        Self { params }
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        match self.params.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Returns true if the field is present and not null
    pub fn has(&self, field: &str) -> bool {
        self.present(field).is_some()
    }

    /// Reads an optional string field
    pub fn optional_string(&self, field: &str) -> Result<Option<&'a str>, PathError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(PathError::InvalidParameter(field.to_string())),
        }
    }

    /// Reads a required string field
    pub fn required_string(&self, field: &str) -> Result<&'a str, PathError> {
        match self.optional_string(field)? {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(PathError::MissingParameter(field.to_string())),
        }
    }

    /// Reads an optional boolean field
    pub fn optional_bool(&self, field: &str) -> Result<Option<bool>, PathError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(PathError::InvalidParameter(field.to_string())),
        }
    }

    /// Reads an optional non-negative integer field
    pub fn optional_u64(&self, field: &str) -> Result<Option<u64>, PathError> {
        match self.present(field) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| PathError::InvalidParameter(field.to_string())),
        }
    }

    /// Reads a root field (`rootPath`, `srcRootPath`, `destRootPath`)
    pub fn root(&self, field: &str) -> Result<RootKind, PathError> {
        match self.present(field) {
            None => Err(PathError::MissingParameter(field.to_string())),
            Some(Value::String(s)) if s.is_empty() => {
                Err(PathError::MissingParameter(field.to_string()))
            }
            Some(Value::String(s)) => s
                .parse()
                .map_err(|_| PathError::InvalidParameter(field.to_string())),
            Some(_) => Err(PathError::InvalidParameter(field.to_string())),
        }
    }

    /// Reads a path field
    ///
    /// A non-string path is reported as an invalid path.
    pub fn path(&self, field: &str) -> Result<Option<&'a str>, PathError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(PathError::InvalidPath(format!("{} is not a string", field))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_root_field() {
        let map = params(json!({"rootPath": "app", "srcRootPath": "DRIVE", "destRootPath": "x"}));
        let fields = RequestFields::new(&map);

        assert_eq!(fields.root("rootPath"), Ok(RootKind::App));
        assert_eq!(fields.root("srcRootPath"), Ok(RootKind::Drive));
        assert_eq!(
            fields.root("destRootPath"),
            Err(PathError::InvalidParameter("destRootPath".to_string()))
        );
        assert_eq!(
            fields.root("missing"),
            Err(PathError::MissingParameter("missing".to_string()))
        );
    }

    #[test]
    fn test_null_is_absent() {
        let map = params(json!({"metadata": null, "isPrivate": null}));
        let fields = RequestFields::new(&map);

        assert_eq!(fields.optional_string("metadata"), Ok(None));
        assert_eq!(fields.optional_bool("isPrivate"), Ok(None));
        assert!(!fields.has("metadata"));
    }

    #[test]
    fn test_type_errors_name_the_field() {
        let map = params(json!({"metadata": 2, "isPrivate": "yes", "offset": -1}));
        let fields = RequestFields::new(&map);

        assert_eq!(
            fields.optional_string("metadata"),
            Err(PathError::InvalidParameter("metadata".to_string()))
        );
        assert_eq!(
            fields.optional_bool("isPrivate"),
            Err(PathError::InvalidParameter("isPrivate".to_string()))
        );
        assert_eq!(
            fields.optional_u64("offset"),
            Err(PathError::InvalidParameter("offset".to_string()))
        );
    }

    #[test]
    fn test_required_string() {
        let map = params(json!({"keyword": "", "pin": "1234"}));
        let fields = RequestFields::new(&map);

        assert_eq!(fields.required_string("pin"), Ok("1234"));
        assert_eq!(
            fields.required_string("keyword"),
            Err(PathError::MissingParameter("keyword".to_string()))
        );
    }

    #[test]
    fn test_non_string_path_is_invalid_path() {
        let map = params(json!({"path": 12}));
        let fields = RequestFields::new(&map);
        assert!(matches!(fields.path("path"), Err(PathError::InvalidPath(_))));
    }
}
