//! Assembly of the object store and user directory from configuration.

use std::sync::Arc;

use anyhow::Result;
use s3fm_core::FileManager;
use s3fm_core::config::{FileManagerConfig, SecretBackend, StorageBackend};
use s3fm_core::secrets::{FileSecretStore, SecretStore};
use s3fm_core::storage::{InMemoryObjectStore, ObjectStore};
use s3fm_core::users::UserDirectory;
use tracing::info;

/// Build the handler with the configured backends.
///
/// # Errors
///
/// Fails when an AWS backend is selected in a build without the `aws` feature.
pub async fn build_file_manager(config: &FileManagerConfig) -> Result<FileManager> {
    #[cfg(feature = "aws")]
    let sdk_config = if config.storage_backend == StorageBackend::S3
        || config.secret_backend == SecretBackend::SecretsManager
    {
        Some(s3fm_aws::load_sdk_config(&config.default_region, config.endpoint_url.as_deref()).await)
    } else {
        None
    };

    let store: Arc<dyn ObjectStore> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(InMemoryObjectStore::new(config.bucket_name.clone())),
        #[cfg(feature = "aws")]
        StorageBackend::S3 => match &sdk_config {
            Some(sdk_config) => Arc::new(s3fm_aws::S3ObjectStore::from_sdk_config(
                sdk_config,
                config.bucket_name.clone(),
            )),
            None => anyhow::bail!("SDK configuration was not loaded for the s3 backend"),
        },
        #[cfg(not(feature = "aws"))]
        StorageBackend::S3 => anyhow::bail!("the s3 storage backend requires the `aws` feature"),
    };

    let secrets: Arc<dyn SecretStore> = match config.secret_backend {
        SecretBackend::File => Arc::new(FileSecretStore::new(&config.users_file)),
        #[cfg(feature = "aws")]
        SecretBackend::SecretsManager => match &sdk_config {
            Some(sdk_config) => Arc::new(s3fm_aws::SecretsManagerStore::from_sdk_config(sdk_config)),
            None => anyhow::bail!("SDK configuration was not loaded for the secretsmanager backend"),
        },
        #[cfg(not(feature = "aws"))]
        SecretBackend::SecretsManager => {
            anyhow::bail!("the secretsmanager secret backend requires the `aws` feature")
        }
    };

    info!(
        storage_backend = %config.storage_backend,
        secret_backend = %config.secret_backend,
        bucket = %config.bucket_name,
        secret = %config.secret_name,
        "configured backends"
    );

    let directory = Arc::new(UserDirectory::new(secrets, config.secret_name.clone()));
    Ok(FileManager::new(config.clone(), store, directory))
}
