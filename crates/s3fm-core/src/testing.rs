//! Shared fixtures for handler tests.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use s3fm_model::RequestEnvelope;

use crate::config::FileManagerConfig;
use crate::error::StorageError;
use crate::provider::FileManager;
use crate::secrets::StaticSecretStore;
use crate::storage::{InMemoryObjectStore, ObjectListing, ObjectStore};
use crate::users::UserDirectory;

pub(crate) const SECRET_NAME: &str = "s3fm-users";

pub(crate) const USERS: &str = r#"{
    "alice": {"password": "pw1", "root_folder": "alice/"},
    "bob": {"password": "pw2", "root_folder": "bob/"}
}"#;

pub(crate) fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}

pub(crate) fn alice_request(method: &str, path: &str) -> RequestEnvelope {
    RequestEnvelope::new(method, path).with_header("Authorization", basic("alice", "pw1"))
}

pub(crate) fn directory() -> Arc<UserDirectory> {
    let secrets = Arc::new(StaticSecretStore::with_secret(SECRET_NAME, USERS));
    Arc::new(UserDirectory::new(secrets, SECRET_NAME))
}

pub(crate) fn manager(store: Arc<dyn ObjectStore>) -> FileManager {
    FileManager::new(FileManagerConfig::default(), store, directory())
}

pub(crate) fn manager_with_store() -> (FileManager, Arc<InMemoryObjectStore>) {
    let store = Arc::new(InMemoryObjectStore::new("s3fm-files"));
    (manager(Arc::clone(&store) as _), store)
}

pub(crate) async fn seed(store: &InMemoryObjectStore, key: &str) {
    store
        .put_object(key, Bytes::from_static(b"data"))
        .await
        .unwrap();
}

pub(crate) async fn manager_with_objects(keys: &[&str]) -> FileManager {
    let (manager, store) = manager_with_store();
    for key in keys {
        seed(&store, key).await;
    }
    manager
}

/// Delegates to an in-memory store but fails selected calls with a backend error.
#[derive(Debug)]
pub(crate) struct FailingStore {
    inner: InMemoryObjectStore,
    message: String,
    deletes_only: bool,
}

impl FailingStore {
    pub(crate) fn delete_only(message: &str) -> Self {
        Self {
            inner: InMemoryObjectStore::new("s3fm-files"),
            message: message.to_owned(),
            deletes_only: true,
        }
    }

    pub(crate) fn all(message: &str) -> Self {
        Self {
            deletes_only: false,
            ..Self::delete_only(message)
        }
    }

    pub(crate) async fn seed(&self, key: &str) {
        seed(&self.inner, key).await;
    }

    pub(crate) fn manager(self) -> FileManager {
        manager(Arc::new(self))
    }

    fn fail<T>(&self, is_delete: bool) -> Option<Result<T, StorageError>> {
        (is_delete || !self.deletes_only).then(|| Err(StorageError::Backend(self.message.clone())))
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    async fn put_object(&self, key: &str, body: Bytes) -> Result<(), StorageError> {
        match self.fail(false) {
            Some(err) => err,
            None => self.inner.put_object(key, body).await,
        }
    }

    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        match self.fail(false) {
            Some(err) => err,
            None => self.inner.get_object(key).await,
        }
    }

    async fn list_objects(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<ObjectListing, StorageError> {
        match self.fail(false) {
            Some(err) => err,
            None => self.inner.list_objects(prefix, delimiter).await,
        }
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        match self.fail(true) {
            Some(err) => err,
            None => self.inner.delete_object(key).await,
        }
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError> {
        match self.fail(true) {
            Some(err) => err,
            None => self.inner.delete_objects(keys).await,
        }
    }
}
