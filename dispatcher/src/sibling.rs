//! Engines for modules served outside this workspace

use async_trait::async_trait;
use identity::SafeDriveKey;
use serde_json::{Map, Value};
use services_directory::OperationError;
use session_manager::ClientHandle;

/// An engine the dispatcher forwards a whole module to
///
/// The engine receives the same client handle and drive grant a directory
/// request would, and owns its own action set.
#[async_trait]
pub trait SiblingEngine: Send + Sync {
    /// Returns true if `action` is one this engine serves
    fn supports(&self, action: &str) -> bool;

    /// Runs `action`, returning the response data if any
    async fn execute(
        &self,
        action: &str,
        handle: &ClientHandle,
        drive_key: Option<&SafeDriveKey>,
        params: &Map<String, Value>,
    ) -> Result<Option<Value>, OperationError>;
}
