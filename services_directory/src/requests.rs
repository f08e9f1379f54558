//! Typed operation requests
//!
//! Each request is parsed from the parameter object of an envelope. Parsing
//! applies every validation rule that does not need the network, in a fixed
//! order: root fields, then path presence and syntax, then optional field
//! types, then cross-field rules.

use core_types::RootKind;
use fs_view::{MutationKind, PathError, PathResolver, RequestFields, ValidatedPath};
use identity::{AppInfo, AuthContext, SafeDriveKey};
use native_client::{DirectoryChange, Namespace, TransferMode, WriterId};
use serde_json::{Map, Value};

/// Who an operation runs for
///
/// Decides which app root the `app` namespace means and whether the drive
/// is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallScope {
    pub app: AppInfo,
    pub drive_key: Option<SafeDriveKey>,
}

impl CallScope {
    /// Scope of an authorised caller
    ///
    /// `default_app` is used when the context names no application.
    pub fn from_auth(auth: &AuthContext, default_app: &AppInfo) -> Self {
        Self {
            app: auth.app.clone().unwrap_or_else(|| default_app.clone()),
            drive_key: auth.drive_grant().cloned(),
        }
    }

    /// Namespace a root kind addresses for this caller
    pub fn namespace(&self, root: RootKind) -> Namespace {
        match root {
            RootKind::App => Namespace::App(self.app.clone()),
            RootKind::Drive => Namespace::Drive(self.drive_key.clone()),
        }
    }
}

fn resolve(
    fields: &RequestFields<'_>,
    root_field: &str,
    path_field: &str,
    mutation: MutationKind,
) -> Result<ValidatedPath, PathError> {
    let root = fields.root(root_field)?;
    let raw_path = fields.path(path_field)?;
    PathResolver::resolve(root, raw_path, mutation)
}

/// `create-directory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDirectoryRequest {
    pub path: ValidatedPath,
    pub metadata: String,
    pub is_private: bool,
}

impl CreateDirectoryRequest {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, PathError> {
        let fields = RequestFields::new(params);
        let path = resolve(&fields, "rootPath", "path", MutationKind::Create)?;
        let metadata = fields.optional_string("metadata")?.unwrap_or_default();
        let is_private = fields.optional_bool("isPrivate")?.unwrap_or(false);

        Ok(Self {
            path,
            metadata: metadata.to_string(),
            is_private,
        })
    }
}

/// `get-directory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDirectoryRequest {
    pub path: ValidatedPath,
}

impl GetDirectoryRequest {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, PathError> {
        let fields = RequestFields::new(params);
        let path = resolve(&fields, "rootPath", "path", MutationKind::Read)?;
        Ok(Self { path })
    }
}

/// `delete-directory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDirectoryRequest {
    pub path: ValidatedPath,
}

impl DeleteDirectoryRequest {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, PathError> {
        let fields = RequestFields::new(params);
        let path = resolve(&fields, "rootPath", "path", MutationKind::Delete)?;
        Ok(Self { path })
    }
}

/// `modify-directory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyDirectoryRequest {
    pub path: ValidatedPath,
    pub change: DirectoryChange,
}

impl ModifyDirectoryRequest {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, PathError> {
        let fields = RequestFields::new(params);
        let path = resolve(&fields, "rootPath", "path", MutationKind::Modify)?;

        let name = fields.optional_string("name")?;
        if let Some(name) = name {
            if !PathResolver::is_valid_name(name) {
                return Err(PathError::InvalidParameter("name".to_string()));
            }
        }
        let metadata = fields.optional_string("metadata")?;

        let change = DirectoryChange {
            name: name.map(str::to_string),
            metadata: metadata.map(str::to_string),
        };
        if change.is_empty() {
            return Err(PathError::MissingParameters);
        }

        Ok(Self { path, change })
    }
}

/// `move-directory`
///
/// The source becomes a child of the destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDirectoryRequest {
    pub src: ValidatedPath,
    pub dest: ValidatedPath,
    pub mode: TransferMode,
}

impl MoveDirectoryRequest {
    const REQUIRED: [&'static str; 4] = ["srcRootPath", "srcPath", "destRootPath", "destPath"];

    pub fn from_params(params: &Map<String, Value>) -> Result<Self, PathError> {
        let fields = RequestFields::new(params);
        if Self::REQUIRED.iter().any(|field| !fields.has(field)) {
            return Err(PathError::MissingParameters);
        }

        let src_root = fields.root("srcRootPath")?;
        let dest_root = fields.root("destRootPath")?;
        let src = PathResolver::resolve(src_root, fields.path("srcPath")?, MutationKind::Source)?;
        let dest = PathResolver::resolve(
            dest_root,
            fields.path("destPath")?,
            MutationKind::Destination,
        )?;

        let mode = match fields.optional_string("action")? {
            None => TransferMode::Move,
            Some(action) => action
                .parse()
                .map_err(|_| PathError::InvalidParameter("action".to_string()))?,
        };

        Ok(Self { src, dest, mode })
    }
}

/// `create-file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFileRequest {
    pub path: ValidatedPath,
    pub metadata: String,
}

impl CreateFileRequest {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, PathError> {
        let fields = RequestFields::new(params);
        let path = resolve(&fields, "rootPath", "filePath", MutationKind::Create)?;
        let metadata = fields.optional_string("metadata")?.unwrap_or_default();
        Ok(Self {
            path,
            metadata: metadata.to_string(),
        })
    }
}

fn writer_id(fields: &RequestFields<'_>) -> Result<WriterId, PathError> {
    fields
        .required_string("writerId")?
        .parse()
        .map_err(|_| PathError::InvalidParameter("writerId".to_string()))
}

/// `write-file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFileRequest {
    pub writer: WriterId,
    /// Append when absent
    pub offset: Option<u64>,
    pub content: Vec<u8>,
}

impl WriteFileRequest {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, PathError> {
        let fields = RequestFields::new(params);
        let writer = writer_id(&fields)?;
        let offset = fields.optional_u64("offset")?;
        let content = fields
            .optional_string("content")?
            .ok_or_else(|| PathError::MissingParameter("content".to_string()))?;

        Ok(Self {
            writer,
            offset,
            content: content.as_bytes().to_vec(),
        })
    }
}

/// `close-file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFileRequest {
    pub writer: WriterId,
}

impl CloseFileRequest {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, PathError> {
        let fields = RequestFields::new(params);
        Ok(Self {
            writer: writer_id(&fields)?,
        })
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
    fn test_create_validation_order() {
        // Root field is checked before the path.
        let err = CreateDirectoryRequest::from_params(&params(json!({"path": "/"}))).unwrap_err();
        assert_eq!(err, PathError::MissingParameter("rootPath".to_string()));

        for path in [json!(null), json!("/")] {
            let err = CreateDirectoryRequest::from_params(&params(
                json!({"rootPath": "app", "path": path, "metadata": 1}),
            ))
            .unwrap_err();
            assert!(matches!(err, PathError::InvalidPath(_)));
        }

        let err = CreateDirectoryRequest::from_params(&params(
            json!({"rootPath": "app", "path": "a", "metadata": 1}),
        ))
        .unwrap_err();
        assert_eq!(err, PathError::InvalidParameter("metadata".to_string()));

        let err = CreateDirectoryRequest::from_params(&params(
            json!({"rootPath": "app", "path": "a", "isPrivate": "true"}),
        ))
        .unwrap_err();
        assert_eq!(err, PathError::InvalidParameter("isPrivate".to_string()));
    }

    #[test]
    fn test_create_defaults() {
        let request =
            CreateDirectoryRequest::from_params(&params(json!({"rootPath": "drive", "path": "/a/b"})))
                .unwrap();
        assert_eq!(request.path.root(), RootKind::Drive);
        assert_eq!(request.path.components(), ["a".to_string(), "b".to_string()]);
        assert_eq!(request.metadata, "");
        assert!(!request.is_private);
    }

    #[test]
    fn test_get_defaults_to_root() {
        let request = GetDirectoryRequest::from_params(&params(json!({"rootPath": "app"}))).unwrap();
        assert!(request.path.is_root());
    }

    #[test]
    fn test_delete_root() {
        for path in [json!(null), json!("/")] {
            let err = DeleteDirectoryRequest::from_params(&params(
                json!({"rootPath": "app", "path": path}),
            ))
            .unwrap_err();
            assert_eq!(err, PathError::CannotDeleteRoot);
        }
    }

    #[test]
    fn test_modify_rules() {
        let err = ModifyDirectoryRequest::from_params(&params(
            json!({"rootPath": "app", "path": "a"}),
        ))
        .unwrap_err();
        assert_eq!(err, PathError::MissingParameters);

        let err = ModifyDirectoryRequest::from_params(&params(
            json!({"rootPath": "app", "path": "a", "name": true}),
        ))
        .unwrap_err();
        assert_eq!(err, PathError::InvalidParameter("name".to_string()));

        let err = ModifyDirectoryRequest::from_params(&params(
            json!({"rootPath": "app", "path": "a", "name": "x/y"}),
        ))
        .unwrap_err();
        assert_eq!(err, PathError::InvalidParameter("name".to_string()));

        let request = ModifyDirectoryRequest::from_params(&params(
            json!({"rootPath": "app", "path": "a", "metadata": "m"}),
        ))
        .unwrap();
        assert_eq!(request.change.metadata.as_deref(), Some("m"));
        assert_eq!(request.change.name, None);
    }

    #[test]
    fn test_move_missing_fields() {
        let cases = [
            json!({}),
            json!({"srcRootPath": "app"}),
            json!({"srcRootPath": "app", "destRootPath": "app"}),
            json!({"srcRootPath": "app", "destRootPath": "app", "srcPath": "a"}),
        ];
        for case in cases {
            let err = MoveDirectoryRequest::from_params(&params(case)).unwrap_err();
            assert_eq!(err, PathError::MissingParameters);
        }
    }

    #[test]
    fn test_move_invalid_fields() {
        let err = MoveDirectoryRequest::from_params(&params(json!({
            "srcRootPath": "test", "destRootPath": "app", "srcPath": "a", "destPath": "a"
        })))
        .unwrap_err();
        assert_eq!(err, PathError::InvalidParameter("srcRootPath".to_string()));

        let err = MoveDirectoryRequest::from_params(&params(json!({
            "srcRootPath": "app", "destRootPath": "test", "srcPath": "a", "destPath": "a"
        })))
        .unwrap_err();
        assert_eq!(err, PathError::InvalidParameter("destRootPath".to_string()));

        let err = MoveDirectoryRequest::from_params(&params(json!({
            "srcRootPath": "app", "destRootPath": "app", "srcPath": "a", "destPath": "a",
            "action": "test"
        })))
        .unwrap_err();
        assert_eq!(err, PathError::InvalidParameter("action".to_string()));
    }

    #[test]
    fn test_move_into_itself_parses() {
        // Containment needs the tree, so it is left to the native side.
        let request = MoveDirectoryRequest::from_params(&params(json!({
            "srcRootPath": "app", "destRootPath": "app", "srcPath": "a", "destPath": "a/b"
        })))
        .unwrap();
        assert_eq!(request.mode, TransferMode::Move);

        let request = MoveDirectoryRequest::from_params(&params(json!({
            "srcRootPath": "app", "destRootPath": "drive", "srcPath": "a", "destPath": "a",
            "action": "COPY"
        })))
        .unwrap();
        assert_eq!(request.mode, TransferMode::Copy);
    }

    #[test]
    fn test_move_to_destination_root() {
        let request = MoveDirectoryRequest::from_params(&params(json!({
            "srcRootPath": "app", "destRootPath": "app", "srcPath": "a/b", "destPath": "/"
        })))
        .unwrap();
        assert!(request.dest.is_root());
        assert_eq!(request.mode, TransferMode::Move);
    }

    #[test]
    fn test_file_requests() {
        let request = CreateFileRequest::from_params(&params(
            json!({"rootPath": "app", "filePath": "/docs/a.txt"}),
        ))
        .unwrap();
        assert_eq!(request.path.name(), Some("a.txt"));

        let writer = WriterId::new();
        let request = WriteFileRequest::from_params(&params(json!({
            "writerId": writer.as_uuid().to_string(), "content": "hi"
        })))
        .unwrap();
        assert_eq!(request.writer, writer);
        assert_eq!(request.offset, None);
        assert_eq!(request.content, b"hi".to_vec());

        let err = CloseFileRequest::from_params(&params(json!({"writerId": "nope"}))).unwrap_err();
        assert_eq!(err, PathError::InvalidParameter("writerId".to_string()));

        let err = WriteFileRequest::from_params(&params(json!({
            "writerId": writer.as_uuid().to_string()
        })))
        .unwrap_err();
        assert_eq!(err, PathError::MissingParameter("content".to_string()));
    }

    #[test]
    fn test_scope() {
        let default_app = AppInfo::new("default", "Default", "Vendor");
        let scope = CallScope::from_auth(&AuthContext::unauthorised(), &default_app);
        assert_eq!(scope.app, default_app);
        assert_eq!(scope.namespace(RootKind::Drive), Namespace::Drive(None));

        let app = AppInfo::new("net.demo", "Demo", "Vendor");
        let auth = AuthContext::authorised(app.clone()).with_safe_drive_key(SafeDriveKey::new("k"));
        let scope = CallScope::from_auth(&auth, &default_app);
        assert_eq!(scope.namespace(RootKind::App), Namespace::App(app));
        assert!(scope.drive_key.is_some());
    }
}
