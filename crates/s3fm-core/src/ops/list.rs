//! Listing handlers.

use s3fm_model::FileError;
use tracing::{debug, warn};

use super::{OperationOutput, RequestContext};
use crate::keys::{normalize_key, select_listed_files, strip_folder};
use crate::provider::FileManager;
use crate::storage::ObjectListing;

fn warn_if_truncated(listing: &ObjectListing, prefix: &str) {
    if listing.is_truncated {
        warn!(prefix, "listing truncated to a single page");
    }
}

impl FileManager {
    /// List the top-level folders of the caller's root.
    pub(crate) async fn handle_list_folders(
        &self,
        ctx: &RequestContext<'_>,
    ) -> Result<OperationOutput, FileError> {
        let folder = ctx.folder();
        let listing = self.store.list_objects(folder, Some("/")).await?;
        warn_if_truncated(&listing, folder);

        let folders: Vec<String> = listing
            .common_prefixes
            .iter()
            .map(|prefix| strip_folder(prefix, folder))
            .collect();
        debug!(count = folders.len(), "listed folders");
        Ok(OperationOutput::Names(folders))
    }

    /// List the files directly inside `prefix` (or the root).
    pub(crate) async fn handle_list_files(
        &self,
        ctx: &RequestContext<'_>,
    ) -> Result<OperationOutput, FileError> {
        let folder = ctx.folder();
        let prefix = ctx.prefix();
        let search_prefix = normalize_key(folder, prefix.unwrap_or_default());
        let listing = self.store.list_objects(&search_prefix, None).await?;
        warn_if_truncated(&listing, &search_prefix);

        let files = select_listed_files(listing.keys(), folder, prefix);
        debug!(count = files.len(), %search_prefix, "listed files");
        Ok(OperationOutput::Names(files))
    }
}
