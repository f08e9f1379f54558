//! Network connection states reported by the native layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the connection behind one client session
///
/// The native layer reports states as integer codes. Codes this crate does
/// not know are preserved rather than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    /// Session is connected to the network
    Connected,
    /// Session lost its connection
    Disconnected,
    /// The native library could not be loaded
    LibraryLoadError,
    /// Session was shut down
    Terminated,
    /// Code not known to this crate
    Unknown(i32),
}

impl ConnectionState {
    /// Native code for a connected session
    pub const CONNECTED_CODE: i32 = 0;
    /// Native code for a lost connection
    pub const DISCONNECTED_CODE: i32 = -1;
    /// Synthetic code published when the library fails to load
    pub const LIBRARY_LOAD_ERROR_CODE: i32 = -2;
    /// Native code for a terminated session
    pub const TERMINATED_CODE: i32 = -3;

    /// Decodes a native state code
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::CONNECTED_CODE => ConnectionState::Connected,
            Self::DISCONNECTED_CODE => ConnectionState::Disconnected,
            Self::LIBRARY_LOAD_ERROR_CODE => ConnectionState::LibraryLoadError,
            Self::TERMINATED_CODE => ConnectionState::Terminated,
            other => ConnectionState::Unknown(other),
        }
    }

    /// Encodes this state as a native code
    pub fn code(&self) -> i32 {
        match self {
            ConnectionState::Connected => Self::CONNECTED_CODE,
            ConnectionState::Disconnected => Self::DISCONNECTED_CODE,
            ConnectionState::LibraryLoadError => Self::LIBRARY_LOAD_ERROR_CODE,
            ConnectionState::Terminated => Self::TERMINATED_CODE,
            ConnectionState::Unknown(code) => *code,
        }
    }

    /// Returns true if requests can be served in this state
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::LibraryLoadError => write!(f, "LibraryLoadError"),
            ConnectionState::Terminated => write!(f, "Terminated"),
            ConnectionState::Unknown(code) => write!(f, "Unknown({})", code),
        }
    }
}
