//! Directory Service implementation
//!
//! This module provides the service that runs directory operations against a
//! native session.

use crate::operations::{DirectoryOperations, OperationError};
use crate::requests::{
    CallScope, CloseFileRequest, CreateDirectoryRequest, CreateFileRequest,
    DeleteDirectoryRequest, GetDirectoryRequest, ModifyDirectoryRequest, MoveDirectoryRequest,
    WriteFileRequest,
};
use crate::writers::WriterRegistry;
use async_trait::async_trait;
use fs_view::DirectoryListing;
use native_client::{ClientStats, CreateOptions, NativeError, NativeSession, WriterId};
use session_manager::ClientHandle;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info, instrument, warn};

/// Runs a blocking native call on the blocking pool
async fn run_native<T, F>(session: Arc<dyn NativeSession>, call: F) -> Result<T, OperationError>
where
    T: Send + 'static,
    F: FnOnce(&dyn NativeSession) -> Result<T, NativeError> + Send + 'static,
{
    let result = task::spawn_blocking(move || call(session.as_ref())).await?;
    result.map_err(OperationError::from)
}

/// The Directory Service
///
/// Stateless apart from the registry of open writers.
#[derive(Default)]
pub struct DirectoryService {
    writers: WriterRegistry,
}

impl DirectoryService {
    /// Creates a new directory service
    pub fn new() -> Self {
        Self {
            writers: WriterRegistry::new(),
        }
    }

    /// Number of writers not yet closed
    pub fn open_writers(&self) -> usize {
        self.writers.len()
    }
}

#[async_trait]
impl DirectoryOperations for DirectoryService {
    #[instrument(skip_all, fields(path = %request.path))]
    async fn create_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: CreateDirectoryRequest,
    ) -> Result<(), OperationError> {
        let namespace = scope.namespace(request.path.root());
        let options = CreateOptions {
            metadata: request.metadata,
            is_private: request.is_private,
        };
        let components = request.path.components().to_vec();

        run_native(Arc::clone(handle.session()), move |session| {
            session.create_directory(&namespace, &components, &options)
        })
        .await?;
        info!("Directory created");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %request.path))]
    async fn get_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: GetDirectoryRequest,
    ) -> Result<DirectoryListing, OperationError> {
        let namespace = scope.namespace(request.path.root());
        let components = request.path.components().to_vec();

        let listing = run_native(Arc::clone(handle.session()), move |session| {
            session.get_directory(&namespace, &components)
        })
        .await?;
        debug!(
            sub_directories = listing.sub_directories.len(),
            files = listing.files.len(),
            "Directory listed"
        );
        Ok(listing)
    }

    #[instrument(skip_all, fields(path = %request.path))]
    async fn delete_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: DeleteDirectoryRequest,
    ) -> Result<(), OperationError> {
        let namespace = scope.namespace(request.path.root());
        let components = request.path.components().to_vec();

        run_native(Arc::clone(handle.session()), move |session| {
            session.delete_directory(&namespace, &components)
        })
        .await?;
        info!("Directory deleted");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %request.path))]
    async fn modify_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: ModifyDirectoryRequest,
    ) -> Result<(), OperationError> {
        let namespace = scope.namespace(request.path.root());
        let components = request.path.components().to_vec();
        let change = request.change;

        run_native(Arc::clone(handle.session()), move |session| {
            session.modify_directory(&namespace, &components, &change)
        })
        .await?;
        info!("Directory modified");
        Ok(())
    }

    #[instrument(skip_all, fields(src = %request.src, dest = %request.dest, mode = %request.mode))]
    async fn move_directory(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: MoveDirectoryRequest,
    ) -> Result<(), OperationError> {
        let src = scope.namespace(request.src.root());
        let dest = scope.namespace(request.dest.root());
        let src_path = request.src.components().to_vec();
        let dest_path = request.dest.components().to_vec();
        let mode = request.mode;

        run_native(Arc::clone(handle.session()), move |session| {
            session.transfer_directory(&src, &src_path, &dest, &dest_path, mode)
        })
        .await?;
        info!("Directory transferred");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %request.path))]
    async fn create_file(
        &self,
        handle: &ClientHandle,
        scope: &CallScope,
        request: CreateFileRequest,
    ) -> Result<WriterId, OperationError> {
        let namespace = scope.namespace(request.path.root());
        let components = request.path.components().to_vec();
        let metadata = request.metadata;
        let session = Arc::clone(handle.session());

        let writer = run_native(Arc::clone(&session), move |session| {
            session.create_file(&namespace, &components, &metadata)
        })
        .await?;
        self.writers.insert(writer, session);
        info!(%writer, "File writer opened");
        Ok(writer)
    }

    #[instrument(skip_all, fields(writer = %request.writer))]
    async fn write_file(&self, request: WriteFileRequest) -> Result<(), OperationError> {
        let session = self.writers.session(request.writer).ok_or_else(|| {
            OperationError::Path(fs_view::PathError::InvalidParameter("writerId".to_string()))
        })?;

        let WriteFileRequest {
            writer,
            offset,
            content,
        } = request;
        run_native(session, move |session| {
            session.write_file(writer, offset, &content)
        })
        .await
    }

    #[instrument(skip_all, fields(writer = %request.writer))]
    async fn close_file(&self, request: CloseFileRequest) -> Result<(), OperationError> {
        let writer = request.writer;
        let session = self.writers.remove(writer).ok_or_else(|| {
            OperationError::Path(fs_view::PathError::InvalidParameter("writerId".to_string()))
        })?;

        run_native(session, move |session| session.close_file(writer)).await?;
        info!("File writer closed");
        Ok(())
    }

    async fn clean(&self) -> usize {
        let writers = self.writers.drain();
        let count = writers.len();

        for (writer, session) in writers {
            if let Err(error) = run_native(session, move |session| session.close_file(writer)).await
            {
                warn!(%writer, %error, "Writer could not be committed during cleanup");
            }
        }

        if count > 0 {
            info!(count, "Open writers closed");
        }
        count
    }

    async fn stats(&self, handle: &ClientHandle) -> Result<ClientStats, OperationError> {
        run_native(Arc::clone(handle.session()), |session| session.stats()).await
    }
}
