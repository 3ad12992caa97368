//! The file-manager request handler.
//!
//! [`FileManager`] owns the object store, the user directory and the
//! configuration. [`FileManager::handle`] is the only entry point: it takes
//! a request envelope and always returns a response envelope, turning every
//! failure into a JSON error body. Individual operations live in the
//! [`crate::ops`] submodules.

use std::sync::Arc;

use s3fm_model::{FileError, FileErrorKind, FileOperation, RequestEnvelope, ResponseEnvelope};
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::auth::authenticate;
use crate::config::FileManagerConfig;
use crate::ops::{OperationOutput, RequestContext};
use crate::router::{is_preflight, resolve_operation};
use crate::storage::ObjectStore;
use crate::users::UserDirectory;

/// Header a transport may use to pass its request id down.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// The file-manager handler.
///
/// All fields are `Arc`-wrapped so the handler can be shared across
/// connection tasks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use s3fm_core::FileManager;
/// use s3fm_core::config::FileManagerConfig;
/// use s3fm_core::secrets::StaticSecretStore;
/// use s3fm_core::storage::InMemoryObjectStore;
/// use s3fm_core::users::UserDirectory;
/// use s3fm_model::RequestEnvelope;
///
/// # tokio_test::block_on(async {
/// let directory = UserDirectory::new(Arc::new(StaticSecretStore::new()), "users");
/// let manager = FileManager::new(
///     FileManagerConfig::default(),
///     Arc::new(InMemoryObjectStore::new("files")),
///     Arc::new(directory),
/// );
/// let resp = manager.handle(RequestEnvelope::new("OPTIONS", "/put")).await;
/// assert_eq!(resp.status_code, 200);
/// # });
/// ```
#[derive(Debug)]
pub struct FileManager {
    /// Object body storage.
    pub(crate) store: Arc<dyn ObjectStore>,
    /// Cached user table.
    pub(crate) directory: Arc<UserDirectory>,
    /// Handler configuration.
    pub(crate) config: Arc<FileManagerConfig>,
}

impl FileManager {
    /// Create a handler.
    #[must_use]
    pub fn new(
        config: FileManagerConfig,
        store: Arc<dyn ObjectStore>,
        directory: Arc<UserDirectory>,
    ) -> Self {
        Self {
            store,
            directory,
            config: Arc::new(config),
        }
    }

    /// Returns the object store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Returns the user directory.
    #[must_use]
    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    /// Returns the handler configuration.
    #[must_use]
    pub fn config(&self) -> &FileManagerConfig {
        &self.config
    }

    /// Handle one request. Never fails: errors become JSON error responses.
    ///
    /// The request id logged with every event is taken from the
    /// `X-Request-Id` header when a transport set one.
    pub async fn handle(&self, request: RequestEnvelope) -> ResponseEnvelope {
        let request_id = request
            .header(REQUEST_ID_HEADER)
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);
        let span = info_span!(
            "request",
            %request_id,
            method = %request.http_method,
            path = %request.path,
        );
        self.process(&request).instrument(span).await
    }

    async fn process(&self, request: &RequestEnvelope) -> ResponseEnvelope {
        match self
            .execute(request)
            .await
            .and_then(OperationOutput::into_response)
        {
            Ok(response) => {
                debug!(status = response.status_code, "request completed");
                response
            }
            Err(err) => {
                log_failure(&err);
                err.to_response()
            }
        }
    }

    async fn execute(&self, request: &RequestEnvelope) -> Result<OperationOutput, FileError> {
        if is_preflight(request) {
            return Ok(OperationOutput::Empty);
        }

        let identity = authenticate(request, &self.directory)
            .await?
            .ok_or_else(FileError::unauthorized)?;
        let operation = resolve_operation(request).ok_or_else(FileError::unsupported_operation)?;
        debug!(user = %identity.username, %operation, "dispatching");

        let ctx = RequestContext::new(identity, request);
        self.dispatch(operation, &ctx).await
    }

    async fn dispatch(
        &self,
        operation: FileOperation,
        ctx: &RequestContext<'_>,
    ) -> Result<OperationOutput, FileError> {
        match operation {
            FileOperation::Preflight => Ok(OperationOutput::Empty),
            FileOperation::PutObject => self.handle_put_object(ctx).await,
            FileOperation::GetObject => self.handle_get_object(ctx).await,
            FileOperation::DeleteObject => self.handle_delete_object(ctx).await,
            FileOperation::ListFolders => self.handle_list_folders(ctx).await,
            FileOperation::ListFiles => self.handle_list_files(ctx).await,
            FileOperation::DownloadFolder => self.handle_download_folder(ctx).await,
            FileOperation::DeleteFolder => self.handle_delete_folder(ctx).await,
        }
    }
}

fn log_failure(err: &FileError) {
    match err.kind {
        FileErrorKind::OperationFailed | FileErrorKind::Internal => {
            error!(kind = %err.kind, error = %err.message, "request failed");
        }
        FileErrorKind::Unauthorized => debug!("request unauthorized"),
        _ => warn!(kind = %err.kind, error = %err.message, "request rejected"),
    }
}
