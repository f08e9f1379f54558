//! Closed enumerations shared across the service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of native client session
///
/// At most one session of each kind is alive at a time. The two kinds are
/// independent: logging in does not close the anonymous session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// Unauthenticated session, created on demand
    Anonymous,
    /// Session bound to an account's credentials
    Authenticated,
}

impl HandleKind {
    /// Both kinds, in the order they are torn down on cleanup
    pub const ALL: [HandleKind; 2] = [HandleKind::Authenticated, HandleKind::Anonymous];
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Anonymous => write!(f, "anonymous"),
            HandleKind::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Namespace root a directory path is anchored at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootKind {
    /// Per-application sandbox, created implicitly
    App,
    /// Shared drive, requires an explicit grant
    Drive,
}

impl RootKind {
    /// Wire spelling of this root
    pub fn as_str(&self) -> &'static str {
        match self {
            RootKind::App => "app",
            RootKind::Drive => "drive",
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootKind {
    type Err = String;

    /// Parses the wire spelling; matching is case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "app" => Ok(RootKind::App),
            "drive" => Ok(RootKind::Drive),
            other => Err(other.to_string()),
        }
    }
}
