//! File-manager operation enum.

use std::fmt;

/// Every operation the handler can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOperation {
    /// CORS preflight (`OPTIONS` on any path), answered without auth.
    Preflight,

    // Single objects
    /// Upload a file or create a folder marker.
    PutObject,
    /// Download a file.
    GetObject,
    /// Delete a file.
    DeleteObject,

    // Listings
    /// List the top-level folders of the user's root.
    ListFolders,
    /// List the files directly inside a folder.
    ListFiles,

    // Folders
    /// Download every object under a prefix as a zip archive.
    DownloadFolder,
    /// Delete every object under a prefix.
    DeleteFolder,
}

impl FileOperation {
    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preflight => "Preflight",
            Self::PutObject => "PutObject",
            Self::GetObject => "GetObject",
            Self::DeleteObject => "DeleteObject",
            Self::ListFolders => "ListFolders",
            Self::ListFiles => "ListFiles",
            Self::DownloadFolder => "DownloadFolder",
            Self::DeleteFolder => "DeleteFolder",
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
