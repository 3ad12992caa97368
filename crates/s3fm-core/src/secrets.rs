//! Secret store seam.
//!
//! The user directory lives in a single secret whose string value is a JSON
//! document. [`SecretStore`] fetches that string by name;
//! [`StaticSecretStore`] serves it from memory and [`FileSecretStore`] reads
//! it from a local file.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::SecretError;

/// Fetches secret string values by name.
#[async_trait]
pub trait SecretStore: Send + Sync + fmt::Debug {
    /// Return the string value of the secret called `name`.
    async fn get_secret_string(&self, name: &str) -> Result<String, SecretError>;
}

/// Secrets held in memory.
///
/// Counts fetches so callers can observe caching behavior.
#[derive(Default)]
pub struct StaticSecretStore {
    secrets: RwLock<HashMap<String, String>>,
    fetches: AtomicUsize,
}

impl fmt::Debug for StaticSecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSecretStore")
            .field("secrets_count", &self.secrets.read().len())
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

impl StaticSecretStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single secret.
    #[must_use]
    pub fn with_secret(name: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_secret(name, value);
        store
    }

    /// Create or replace a secret.
    pub fn set_secret(&self, name: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(name.into(), value.into());
    }

    /// Number of `get_secret_string` calls served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret_string(&self, name: &str) -> Result<String, SecretError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.secrets
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::NotFound {
                name: name.to_owned(),
            })
    }
}

/// Reads the secret value from a file on disk.
///
/// The file holds the value of the one configured secret; the requested
/// name is only used for logging.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Create a store reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret_string(&self, name: &str) -> Result<String, SecretError> {
        debug!(secret = name, path = %self.path.display(), "reading secret file");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SecretError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_should_serve_static_secret_and_count_fetches() {
        let store = StaticSecretStore::with_secret("users", "{}");
        assert_eq!(store.get_secret_string("users").await.unwrap(), "{}");
        assert_eq!(store.get_secret_string("users").await.unwrap(), "{}");
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_should_report_missing_static_secret() {
        let store = StaticSecretStore::new();
        let err = store.get_secret_string("users").await.unwrap_err();
        assert!(matches!(err, SecretError::NotFound { name } if name == "users"));
    }

    #[tokio::test]
    async fn test_should_read_secret_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"alice": {{"password": "pw", "root_folder": "alice/"}}}}"#).unwrap();

        let store = FileSecretStore::new(file.path());
        let value = store.get_secret_string("s3fm-users").await.unwrap();
        assert!(value.contains("alice/"));
    }

    #[tokio::test]
    async fn test_should_fail_on_missing_secret_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSecretStore::new(dir.path().join("nope.json"));
        let err = store.get_secret_string("s3fm-users").await.unwrap_err();
        assert!(matches!(err, SecretError::Io { .. }));
    }
}
