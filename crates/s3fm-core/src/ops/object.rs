//! Single-object handlers: upload, download and delete.

use bytes::Bytes;
use s3fm_model::FileError;
use s3fm_model::envelope::CONTENT_TYPE_OCTET_STREAM;
use tracing::{debug, warn};

use super::{OperationOutput, RequestContext};
use crate::codec::decode_lenient;
use crate::error::StorageError;
use crate::keys::normalize_key;
use crate::provider::FileManager;

/// Body stored for a folder marker uploaded without content.
pub const FOLDER_PLACEHOLDER: &[u8] = b" ";

/// Decode an upload body. A missing body is empty; characters outside the
/// base64 alphabet are ignored.
fn decode_body(body: Option<&str>) -> Result<Vec<u8>, FileError> {
    decode_lenient(body.unwrap_or_default())
        .map_err(|e| FileError::internal(format!("Invalid base64 body: {e}")).with_source(e))
}

impl FileManager {
    /// Upload a file, or create a folder marker when the name ends with `/`.
    pub(crate) async fn handle_put_object(
        &self,
        ctx: &RequestContext<'_>,
    ) -> Result<OperationOutput, FileError> {
        let filename = ctx.filename().ok_or_else(FileError::missing_filename)?;
        let mut content = decode_body(ctx.request.body.as_deref())?;
        let key = normalize_key(ctx.folder(), filename);
        let is_folder = filename.ends_with('/');
        if is_folder && content.is_empty() {
            content = FOLDER_PLACEHOLDER.to_vec();
        }

        debug!(%key, size = content.len(), is_folder, "uploading object");
        self.store.put_object(&key, Bytes::from(content)).await?;

        Ok(OperationOutput::Message(if is_folder {
            format!("Folder \"{filename}\" created")
        } else {
            format!("File \"{filename}\" uploaded")
        }))
    }

    /// Download a single file.
    pub(crate) async fn handle_get_object(
        &self,
        ctx: &RequestContext<'_>,
    ) -> Result<OperationOutput, FileError> {
        let filename = ctx.filename().ok_or_else(FileError::unsupported_operation)?;
        let key = normalize_key(ctx.folder(), filename);
        match self.store.get_object(&key).await {
            Ok(data) => Ok(OperationOutput::Binary {
                data: data.to_vec(),
                content_type: CONTENT_TYPE_OCTET_STREAM,
            }),
            Err(StorageError::NoSuchKey { .. }) => {
                debug!(%key, "object not found");
                Err(FileError::file_not_found())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a single file.
    pub(crate) async fn handle_delete_object(
        &self,
        ctx: &RequestContext<'_>,
    ) -> Result<OperationOutput, FileError> {
        let filename = ctx.filename().ok_or_else(FileError::unsupported_operation)?;
        let key = normalize_key(ctx.folder(), filename);
        self.store.delete_object(&key).await.map_err(|e| {
            warn!(%key, error = %e, "delete failed");
            FileError::operation_failed(e.to_string()).with_source(e)
        })?;
        Ok(OperationOutput::Message(format!(
            "File \"{filename}\" deleted"
        )))
    }
}
