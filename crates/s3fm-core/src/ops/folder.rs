//! Folder handlers: zip download and recursive delete.

use s3fm_model::FileError;
use s3fm_model::envelope::CONTENT_TYPE_ZIP;
use tracing::{debug, warn};

use super::{OperationOutput, RequestContext};
use crate::archive::{ArchiveBuilder, ArchiveError};
use crate::keys::{normalize_key, strip_folder};
use crate::provider::FileManager;

impl From<ArchiveError> for FileError {
    fn from(err: ArchiveError) -> Self {
        FileError::internal(err.to_string()).with_source(err)
    }
}

impl FileManager {
    /// Download every object under `prefix` as a zip archive.
    ///
    /// Objects are fetched one at a time in listing order; any failure
    /// aborts the whole download.
    pub(crate) async fn handle_download_folder(
        &self,
        ctx: &RequestContext<'_>,
    ) -> Result<OperationOutput, FileError> {
        let folder = ctx.folder();
        let prefix = ctx.prefix().ok_or_else(FileError::unsupported_operation)?;
        let search_prefix = normalize_key(folder, prefix);
        let listing = self.store.list_objects(&search_prefix, None).await?;
        if listing.is_truncated {
            warn!(%search_prefix, "archive limited to a single listing page");
        }

        let mut archive = ArchiveBuilder::new();
        for object in &listing.contents {
            let data = self.store.get_object(&object.key).await?;
            archive.add_entry(&strip_folder(&object.key, folder), &data)?;
        }
        let entries = archive.len();
        let data = archive.finish()?;

        debug!(%search_prefix, entries, size = data.len(), "built folder archive");
        Ok(OperationOutput::Binary {
            data,
            content_type: CONTENT_TYPE_ZIP,
        })
    }

    /// Delete every object under `prefix` in one batch.
    ///
    /// An empty prefix range succeeds without calling the batch delete.
    pub(crate) async fn handle_delete_folder(
        &self,
        ctx: &RequestContext<'_>,
    ) -> Result<OperationOutput, FileError> {
        let prefix = ctx.prefix().ok_or_else(FileError::unsupported_operation)?;
        let search_prefix = normalize_key(ctx.folder(), prefix);
        let listing = self.store.list_objects(&search_prefix, None).await?;

        if listing.contents.is_empty() {
            debug!(%search_prefix, "nothing to delete");
        } else {
            if listing.is_truncated {
                warn!(%search_prefix, "deleting a single listing page only");
            }
            let keys: Vec<String> = listing.keys().map(str::to_owned).collect();
            self.store.delete_objects(&keys).await.map_err(|e| {
                warn!(%search_prefix, error = %e, "batch delete failed");
                FileError::operation_failed(e.to_string()).with_source(e)
            })?;
            debug!(%search_prefix, count = keys.len(), "deleted folder");
        }

        Ok(OperationOutput::Message(format!(
            "Folder \"{prefix}\" deleted"
        )))
    }
}
