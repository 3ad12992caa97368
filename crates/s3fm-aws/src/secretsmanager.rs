//! [`SecretStore`] over `aws-sdk-secretsmanager`.

use std::fmt;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata};
use s3fm_core::error::SecretError;
use s3fm_core::secrets::SecretStore;
use tracing::debug;

use crate::error_text;

/// Reads secrets from AWS Secrets Manager.
#[derive(Clone)]
pub struct SecretsManagerStore {
    client: Client,
}

impl fmt::Debug for SecretsManagerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretsManagerStore").finish_non_exhaustive()
    }
}

impl SecretsManagerStore {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from shared SDK configuration.
    #[must_use]
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn get_secret_string(&self, name: &str) -> Result<String, SecretError> {
        debug!(secret = name, "fetching secret value");
        let output = match self.client.get_secret_value().secret_id(name).send().await {
            Ok(output) => output,
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception()) =>
            {
                return Err(SecretError::NotFound {
                    name: name.to_owned(),
                });
            }
            Err(e) => {
                return Err(SecretError::Backend(error_text(
                    "GetSecretValue",
                    e.code(),
                    e.message(),
                    || DisplayErrorContext(&e).to_string(),
                )));
            }
        };

        output
            .secret_string()
            .map(str::to_owned)
            .ok_or_else(|| SecretError::NotAString {
                name: name.to_owned(),
            })
    }
}
