//! Backend error types.
//!
//! [`StorageError`] and [`SecretError`] are what the storage and secret
//! traits return. Both convert into [`FileError`] so operation handlers can
//! propagate them with `?` and let the outer boundary map them to a 500.

use s3fm_model::FileError;

/// Object storage failure.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The backend rejected or failed the call; carries the backend's text.
    #[error("{0}")]
    Backend(String),

    /// Unexpected failure inside the store itself.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Secret store failure.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// No secret exists under the requested name.
    #[error("Secret not found: {name}")]
    NotFound {
        /// The secret name.
        name: String,
    },

    /// The secret exists but has no string value.
    #[error("Secret {name} has no string value")]
    NotAString {
        /// The secret name.
        name: String,
    },

    /// A local secret file could not be read.
    #[error("Failed to read secret file {path}: {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backend rejected or failed the call.
    #[error("{0}")]
    Backend(String),
}

/// Invalid startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `S3FM_STORAGE_BACKEND` names an unknown backend.
    #[error("Unknown storage backend {0:?} (expected \"memory\" or \"s3\")")]
    UnknownStorageBackend(String),

    /// `S3FM_SECRET_BACKEND` names an unknown backend.
    #[error("Unknown secret backend {0:?} (expected \"file\" or \"secretsmanager\")")]
    UnknownSecretBackend(String),
}

impl From<StorageError> for FileError {
    fn from(err: StorageError) -> Self {
        FileError::internal(err.to_string()).with_source(err)
    }
}

impl From<SecretError> for FileError {
    fn from(err: SecretError) -> Self {
        FileError::internal(err.to_string()).with_source(err)
    }
}
