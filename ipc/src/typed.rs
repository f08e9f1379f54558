//! Typed routing of requests.
//!
//! The `module`/`action` strings of an envelope are parsed exactly once into
//! a closed [`Request`] enum.

use crate::RequestEnvelope;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Description of a response for an unknown module.
pub const MODULE_NOT_FOUND: &str = "Module not found";

/// Description of a response for an unknown action.
pub const ACTION_NOT_FOUND: &str = "Action not found";

/// Routing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Module not found")]
    ModuleNotFound(String),

    #[error("Action not found")]
    ActionNotFound { module: Module, action: String },
}

/// Top-level request modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    Auth,
    Connect,
    Nfs,
    Dns,
    ClientStats,
}

impl Module {
    pub const ALL: [Module; 5] = [
        Module::Auth,
        Module::Connect,
        Module::Nfs,
        Module::Dns,
        Module::ClientStats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Auth => "auth",
            Module::Connect => "connect",
            Module::Nfs => "nfs",
            Module::Dns => "dns",
            Module::ClientStats => "client-stats",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|module| module.as_str() == s)
            .ok_or_else(|| RouteError::ModuleNotFound(s.to_string()))
    }
}

/// Account lifecycle actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthAction {
    Register,
    Login,
    Logout,
    Clean,
}

impl AuthAction {
    pub const ALL: [AuthAction; 4] = [
        AuthAction::Register,
        AuthAction::Login,
        AuthAction::Logout,
        AuthAction::Clean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthAction::Register => "register",
            AuthAction::Login => "login",
            AuthAction::Logout => "logout",
            AuthAction::Clean => "clean",
        }
    }
}

/// Directory and file actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NfsAction {
    CreateDirectory,
    GetDirectory,
    DeleteDirectory,
    ModifyDirectory,
    MoveDirectory,
    CreateFile,
    WriteFile,
    CloseFile,
    Clean,
}

impl NfsAction {
    pub const ALL: [NfsAction; 9] = [
        NfsAction::CreateDirectory,
        NfsAction::GetDirectory,
        NfsAction::DeleteDirectory,
        NfsAction::ModifyDirectory,
        NfsAction::MoveDirectory,
        NfsAction::CreateFile,
        NfsAction::WriteFile,
        NfsAction::CloseFile,
        NfsAction::Clean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NfsAction::CreateDirectory => "create-directory",
            NfsAction::GetDirectory => "get-directory",
            NfsAction::DeleteDirectory => "delete-directory",
            NfsAction::ModifyDirectory => "modify-directory",
            NfsAction::MoveDirectory => "move-directory",
            NfsAction::CreateFile => "create-file",
            NfsAction::WriteFile => "write-file",
            NfsAction::CloseFile => "close-file",
            NfsAction::Clean => "clean",
        }
    }
}

/// Client statistics actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientStatsAction {
    Fetch,
}

impl ClientStatsAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatsAction::Fetch => "fetch",
        }
    }
}

/// A routed request.
///
/// `Dns` keeps its action as a string; the sibling engine that serves it owns
/// its action set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Auth(AuthAction),
    Connect,
    Nfs(NfsAction),
    Dns(String),
    ClientStats(ClientStatsAction),
}

impl Request {
    /// Parses a module/action pair.
    pub fn parse(module: &str, action: &str) -> Result<Self, RouteError> {
        let module: Module = module.parse()?;
        let not_found = || RouteError::ActionNotFound {
            module,
            action: action.to_string(),
        };

        match module {
            Module::Auth => AuthAction::ALL
                .into_iter()
                .find(|a| a.as_str() == action)
                .map(Request::Auth)
                .ok_or_else(not_found),
            // The connect module has a single behaviour; its action is ignored.
            Module::Connect => Ok(Request::Connect),
            Module::Nfs => NfsAction::ALL
                .into_iter()
                .find(|a| a.as_str() == action)
                .map(Request::Nfs)
                .ok_or_else(not_found),
            Module::Dns => Ok(Request::Dns(action.to_string())),
            Module::ClientStats => match action {
                "fetch" => Ok(Request::ClientStats(ClientStatsAction::Fetch)),
                _ => Err(not_found()),
            },
        }
    }

    /// Parses the routing fields of an envelope.
    pub fn from_envelope(envelope: &RequestEnvelope) -> Result<Self, RouteError> {
        Self::parse(&envelope.module, &envelope.action)
    }

    /// Module this request belongs to.
    pub fn module(&self) -> Module {
        match self {
            Request::Auth(_) => Module::Auth,
            Request::Connect => Module::Connect,
            Request::Nfs(_) => Module::Nfs,
            Request::Dns(_) => Module::Dns,
            Request::ClientStats(_) => Module::ClientStats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nfs_actions() {
        for action in NfsAction::ALL {
            assert_eq!(
                Request::parse("nfs", action.as_str()),
                Ok(Request::Nfs(action))
            );
        }
    }

    #[test]
    fn test_parse_auth_actions() {
        for action in AuthAction::ALL {
            assert_eq!(
                Request::parse("auth", action.as_str()),
                Ok(Request::Auth(action))
            );
        }
    }

    #[test]
    fn test_unknown_module() {
        let err = Request::parse("ftp", "get").unwrap_err();
        assert_eq!(err, RouteError::ModuleNotFound("ftp".to_string()));
        assert_eq!(err.to_string(), MODULE_NOT_FOUND);
    }

    #[test]
    fn test_unknown_action() {
        let err = Request::parse("nfs", "explode").unwrap_err();
        assert!(matches!(err, RouteError::ActionNotFound { module: Module::Nfs, .. }));
        assert_eq!(err.to_string(), ACTION_NOT_FOUND);

        assert!(Request::parse("client-stats", "reset").is_err());
    }

    #[test]
    fn test_passthrough_modules() {
        assert_eq!(Request::parse("connect", ""), Ok(Request::Connect));
        assert_eq!(
            Request::parse("dns", "register-service"),
            Ok(Request::Dns("register-service".to_string()))
        );
    }

    #[test]
    fn test_module_names() {
        for module in Module::ALL {
            assert_eq!(module.as_str().parse::<Module>(), Ok(module));
        }
        assert_eq!(Request::Nfs(NfsAction::Clean).module(), Module::Nfs);
        assert_eq!(Module::ClientStats.to_string(), "client-stats");
    }
}
