//! The request dispatcher

use crate::error::DispatchError;
use crate::sibling::SiblingEngine;
use core_types::HandleKind;
use fs_view::{PathError, RequestFields};
use futures::FutureExt;
use identity::{AppInfo, Credentials};
use ipc::{
    AuthAction, ClientStatsAction, Module, NfsAction, Request, RequestEnvelope, Response,
    RouteError,
};
use serde_json::{json, Value};
use services_directory::{
    CallScope, CloseFileRequest, CreateDirectoryRequest, CreateFileRequest,
    DeleteDirectoryRequest, DirectoryOperations, GetDirectoryRequest, ModifyDirectoryRequest,
    MoveDirectoryRequest, OperationError, WriteFileRequest,
};
use session_manager::{ClientHandle, ClientHandleManager, HandleRequest};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type DispatchResult = Result<Option<Value>, DispatchError>;

/// Routes envelopes to the engines that serve them
pub struct Dispatcher {
    manager: Arc<ClientHandleManager>,
    engine: Arc<dyn DirectoryOperations>,
    default_app: AppInfo,
    dns: Option<Arc<dyn SiblingEngine>>,
}

impl Dispatcher {
    /// Creates a dispatcher without a `dns` engine
    ///
    /// `default_app` names the application of requests that carry none.
    pub fn new(
        manager: Arc<ClientHandleManager>,
        engine: Arc<dyn DirectoryOperations>,
        default_app: AppInfo,
    ) -> Self {
        Self {
            manager,
            engine,
            default_app,
            dns: None,
        }
    }

    /// Registers the engine serving the `dns` module (builder pattern)
    pub fn with_dns_engine(mut self, engine: Arc<dyn SiblingEngine>) -> Self {
        self.dns = Some(engine);
        self
    }

    pub fn manager(&self) -> &Arc<ClientHandleManager> {
        &self.manager
    }

    /// Handles one request
    ///
    /// Never fails: errors and panics become failure responses carrying the
    /// request id.
    pub async fn dispatch(&self, envelope: RequestEnvelope) -> Response {
        let id = envelope.id;
        let outcome = AssertUnwindSafe(self.route(&envelope))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(Some(data))) => Response::with_data(id, data),
            Ok(Ok(None)) => Response::ok(id),
            Ok(Err(err)) => {
                debug!(
                    %id,
                    module = %envelope.module,
                    action = %envelope.action,
                    error = %err,
                    "Request failed"
                );
                err.to_response(id)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(
                    %id,
                    module = %envelope.module,
                    action = %envelope.action,
                    %message,
                    "Request handler panicked"
                );
                DispatchError::Panicked(message).to_response(id)
            }
        }
    }

    /// Closes every writer, then releases every client handle
    pub async fn shutdown(&self) {
        let writers = self.engine.clean().await;
        self.manager.shutdown().await;
        info!(writers, "Dispatcher shut down");
    }

    async fn route(&self, envelope: &RequestEnvelope) -> DispatchResult {
        let request = Request::from_envelope(envelope)?;
        debug!(
            id = %envelope.id,
            module = %request.module(),
            action = %envelope.action,
            "Dispatching"
        );

        match request {
            Request::Auth(action) => self.auth(action, envelope).await,
            Request::Connect => self.connect().await,
            Request::Nfs(action) => self.nfs(action, envelope).await,
            Request::Dns(action) => self.dns(&action, envelope).await,
            Request::ClientStats(ClientStatsAction::Fetch) => self.client_stats().await,
        }
    }

    async fn auth(&self, action: AuthAction, envelope: &RequestEnvelope) -> DispatchResult {
        match action {
            AuthAction::Register => {
                let credentials = credentials(envelope)?;
                // Writers are committed before their session is replaced
                self.engine.clean().await;
                self.manager.open(HandleRequest::Register(credentials)).await?;
                info!("Account registered");
                Ok(None)
            }
            AuthAction::Login => {
                let credentials = credentials(envelope)?;
                self.engine.clean().await;
                self.manager.open(HandleRequest::Authenticated(credentials)).await?;
                info!("Logged in");
                Ok(None)
            }
            AuthAction::Logout | AuthAction::Clean => {
                self.engine.clean().await;
                let released = self.manager.release(HandleKind::Authenticated).await;
                info!(released, "Authenticated session ended");
                Ok(None)
            }
        }
    }

    async fn connect(&self) -> DispatchResult {
        self.manager.acquire(HandleRequest::Anonymous).await?;
        let state = self.manager.observer().last_state(HandleKind::Anonymous);
        Ok(Some(json!({ "state": state })))
    }

    async fn nfs(&self, action: NfsAction, envelope: &RequestEnvelope) -> DispatchResult {
        if !envelope.auth.is_authorised {
            return Err(OperationError::Unauthorised.into());
        }

        let handle = self.session_handle().await?;
        let scope = CallScope::from_auth(&envelope.auth, &self.default_app);
        let params = &envelope.params;
        let engine = &self.engine;

        match action {
            NfsAction::CreateDirectory => {
                let request = CreateDirectoryRequest::from_params(params)?;
                engine.create_directory(&handle, &scope, request).await?;
                Ok(None)
            }
            NfsAction::GetDirectory => {
                let request = GetDirectoryRequest::from_params(params)?;
                let listing = engine.get_directory(&handle, &scope, request).await?;
                Ok(Some(serde_json::to_value(listing)?))
            }
            NfsAction::DeleteDirectory => {
                let request = DeleteDirectoryRequest::from_params(params)?;
                engine.delete_directory(&handle, &scope, request).await?;
                Ok(None)
            }
            NfsAction::ModifyDirectory => {
                let request = ModifyDirectoryRequest::from_params(params)?;
                engine.modify_directory(&handle, &scope, request).await?;
                Ok(None)
            }
            NfsAction::MoveDirectory => {
                let request = MoveDirectoryRequest::from_params(params)?;
                engine.move_directory(&handle, &scope, request).await?;
                Ok(None)
            }
            NfsAction::CreateFile => {
                let request = CreateFileRequest::from_params(params)?;
                let writer = engine.create_file(&handle, &scope, request).await?;
                Ok(Some(json!({ "writerId": writer })))
            }
            NfsAction::WriteFile => {
                let request = WriteFileRequest::from_params(params)?;
                engine.write_file(request).await?;
                Ok(None)
            }
            NfsAction::CloseFile => {
                let request = CloseFileRequest::from_params(params)?;
                engine.close_file(request).await?;
                Ok(None)
            }
            NfsAction::Clean => {
                let closed = engine.clean().await;
                debug!(closed, "Writers cleaned");
                Ok(None)
            }
        }
    }

    async fn dns(&self, action: &str, envelope: &RequestEnvelope) -> DispatchResult {
        let engine = self
            .dns
            .as_ref()
            .ok_or_else(|| RouteError::ModuleNotFound(Module::Dns.as_str().to_string()))?;
        if !engine.supports(action) {
            return Err(RouteError::ActionNotFound {
                module: Module::Dns,
                action: action.to_string(),
            }
            .into());
        }

        let handle = self.session_handle().await?;
        let drive_key = envelope.auth.drive_grant();
        Ok(engine
            .execute(action, &handle, drive_key, &envelope.params)
            .await?)
    }

    async fn client_stats(&self) -> DispatchResult {
        let handle = self.session_handle().await?;
        let stats = self.engine.stats(&handle).await?;
        Ok(Some(serde_json::to_value(stats)?))
    }

    /// The authenticated handle if one is open, else the anonymous one
    async fn session_handle(&self) -> Result<ClientHandle, DispatchError> {
        if let Some(handle) = self.manager.cached(HandleKind::Authenticated).await {
            return Ok(handle);
        }
        Ok(self.manager.acquire(HandleRequest::Anonymous).await?)
    }
}

fn credentials(envelope: &RequestEnvelope) -> Result<Credentials, DispatchError> {
    let fields = RequestFields::new(&envelope.params);
    let keyword = fields.required_string("keyword")?;
    let pin = fields.required_string("pin")?;
    let password = fields.required_string("password")?;

    Credentials::new(keyword, pin, password).map_err(|err| {
        warn!(error = %err, "Rejected credentials");
        DispatchError::from(PathError::MissingParameters)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
