//! # Identity
//!
//! This crate describes who is calling the directory service.
//!
//! ## Philosophy
//!
//! - **Identity is explicit and contextual, not global**
//! - **The authorization decision is made elsewhere**: this crate only carries it
//! - **Drive access is a capability**: having the key IS the grant
//!
//! ## Core Concepts
//!
//! - `AuthContext`: Resolved authorization state attached to every request
//! - `AppInfo`: The calling application, which owns one sandboxed root
//! - `SafeDriveKey`: Capability granting access to the shared drive root
//! - `Credentials`: Account secrets used to open an authenticated session
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Token issuance or revocation
//! - Deciding which applications may use the drive

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// The application a request is made on behalf of
///
/// Every application gets its own root directory in the app namespace. The
/// root is created the first time the application touches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppInfo {
    /// Stable application identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Vendor publishing the application
    pub vendor: String,
}

impl AppInfo {
    /// Creates application info
    pub fn new(id: impl Into<String>, name: impl Into<String>, vendor: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            vendor: vendor.into(),
        }
    }

    /// Name of the directory that serves as this application's root
    pub fn root_dir_name(&self) -> String {
        format!("{}-Root-Dir", self.name)
    }
}

impl fmt::Display for AppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} by {})", self.name, self.id, self.vendor)
    }
}

/// Capability to use the shared drive root
///
/// Issued by the authorization collaborator to applications that were granted
/// drive access. The directory service never derives one itself.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeDriveKey(String);

impl SafeDriveKey {
    /// Wraps an issued key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SafeDriveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SafeDriveKey(..)")
    }
}

/// Resolved authorization state for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    /// Whether the caller presented a valid token
    #[serde(default)]
    pub is_authorised: bool,
    /// The calling application, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<AppInfo>,
    /// Drive grant, present only for applications allowed to use the drive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_drive_key: Option<SafeDriveKey>,
}

impl AuthContext {
    /// Context for a caller without a valid token
    pub fn unauthorised() -> Self {
        Self::default()
    }

    /// Context for an authorised application
    pub fn authorised(app: AppInfo) -> Self {
        Self {
            is_authorised: true,
            app: Some(app),
            safe_drive_key: None,
        }
    }

    /// Attaches a drive grant (builder pattern)
    pub fn with_safe_drive_key(mut self, key: SafeDriveKey) -> Self {
        self.safe_drive_key = Some(key);
        self
    }

    /// Fills in the application when the request carried none
    pub fn or_app(mut self, app: &AppInfo) -> Self {
        if self.app.is_none() {
            self.app = Some(app.clone());
        }
        self
    }

    /// Returns the drive key if the caller is authorised and holds one
    pub fn drive_grant(&self) -> Option<&SafeDriveKey> {
        if self.is_authorised {
            self.safe_drive_key.as_ref()
        } else {
            None
        }
    }
}

/// Account secrets used to register or log in
///
/// `keyword` and `pin` locate the account; `password` unlocks it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub keyword: String,
    pub pin: String,
    pub password: String,
}

impl Credentials {
    /// Creates credentials, rejecting empty fields
    pub fn new(
        keyword: impl Into<String>,
        pin: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let credentials = Self {
            keyword: keyword.into(),
            pin: pin.into(),
            password: password.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Checks that every field is present
    pub fn validate(&self) -> Result<(), IdentityError> {
        for (field, value) in [
            ("keyword", &self.keyword),
            ("pin", &self.pin),
            ("password", &self.password),
        ] {
            if value.is_empty() {
                return Err(IdentityError::EmptyField(field));
            }
        }
        Ok(())
    }

    /// Deterministic account locator derived from keyword and pin
    ///
    /// Two credential sets with the same keyword and pin address the same
    /// account regardless of password.
    pub fn account_locator(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.keyword.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.pin.as_bytes());
        hex_string(&hasher.finalize())
    }

    /// Digest of the password, so secrets are never compared in the clear
    pub fn password_digest(&self) -> String {
        hex_string(&Sha256::digest(self.password.as_bytes()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("keyword", &self.keyword)
            .field("pin", &"***")
            .field("password", &"***")
            .finish()
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Identity-related errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Credential field is empty: {0}")]
    EmptyField(&'static str),
}
