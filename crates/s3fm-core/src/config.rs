//! s3fm configuration.
//!
//! Provides [`FileManagerConfig`], loaded from environment variables with
//! defaults suitable for local development (in-memory storage and a JSON
//! users file).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::ConfigError;

/// Where object bodies are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local sorted map; contents are lost on restart.
    #[default]
    Memory,
    /// An S3 bucket reached through the AWS SDK.
    S3,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "s3" => Ok(Self::S3),
            _ => Err(ConfigError::UnknownStorageBackend(s.to_owned())),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::S3 => "s3",
        })
    }
}

/// Where the user directory secret is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// A JSON file on local disk.
    #[default]
    File,
    /// AWS Secrets Manager.
    SecretsManager,
}

impl FromStr for SecretBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "secretsmanager" => Ok(Self::SecretsManager),
            _ => Err(ConfigError::UnknownSecretBackend(s.to_owned())),
        }
    }
}

impl fmt::Display for SecretBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::SecretsManager => "secretsmanager",
        })
    }
}

/// s3fm configuration.
///
/// # Examples
///
/// ```
/// use s3fm_core::config::{FileManagerConfig, StorageBackend};
///
/// let config = FileManagerConfig::default();
/// assert_eq!(config.bucket_name, "s3fm-files");
/// assert_eq!(config.storage_backend, StorageBackend::Memory);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct FileManagerConfig {
    /// Bucket holding every user's files.
    #[builder(default = String::from("s3fm-files"))]
    pub bucket_name: String,

    /// Name of the secret holding the user directory document.
    #[builder(default = String::from("s3fm-users"))]
    pub secret_name: String,

    /// Object storage backend.
    #[builder(default)]
    pub storage_backend: StorageBackend,

    /// Secret store backend.
    #[builder(default)]
    pub secret_backend: SecretBackend,

    /// Users file read by the `file` secret backend.
    #[builder(default = String::from("users.json"))]
    pub users_file: String,

    /// Bind address of the HTTP server (e.g. `"0.0.0.0:8080"`).
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub gateway_listen: String,

    /// AWS region for SDK clients.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Endpoint override for SDK clients (local S3 emulators).
    #[builder(default)]
    pub endpoint_url: Option<String>,

    /// Whether the HTTP adapter writes base64 bodies back as raw bytes.
    #[builder(default = true)]
    pub decode_binary_responses: bool,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for FileManagerConfig {
    fn default() -> Self {
        Self {
            bucket_name: String::from("s3fm-files"),
            secret_name: String::from("s3fm-users"),
            storage_backend: StorageBackend::Memory,
            secret_backend: SecretBackend::File,
            users_file: String::from("users.json"),
            gateway_listen: String::from("0.0.0.0:8080"),
            default_region: String::from("us-east-1"),
            endpoint_url: None,
            decode_binary_responses: true,
            log_level: String::from("info"),
        }
    }
}

impl FileManagerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `S3FM_BUCKET` | `s3fm-files` |
    /// | `S3FM_SECRET_NAME` | `s3fm-users` |
    /// | `S3FM_STORAGE_BACKEND` | `memory` |
    /// | `S3FM_SECRET_BACKEND` | `file` |
    /// | `S3FM_USERS_FILE` | `users.json` |
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8080` |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `AWS_ENDPOINT_URL` | *(unset)* |
    /// | `S3FM_DECODE_BINARY_RESPONSES` | `true` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Errors
    ///
    /// Fails when a backend variable names an unknown backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("S3FM_BUCKET") {
            config.bucket_name = v;
        }
        if let Ok(v) = std::env::var("S3FM_SECRET_NAME") {
            config.secret_name = v;
        }
        if let Ok(v) = std::env::var("S3FM_STORAGE_BACKEND") {
            config.storage_backend = v.parse()?;
        }
        if let Ok(v) = std::env::var("S3FM_SECRET_BACKEND") {
            config.secret_backend = v.parse()?;
        }
        if let Ok(v) = std::env::var("S3FM_USERS_FILE") {
            config.users_file = v;
        }
        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Ok(v) = std::env::var("AWS_ENDPOINT_URL") {
            if !v.is_empty() {
                config.endpoint_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("S3FM_DECODE_BINARY_RESPONSES") {
            config.decode_binary_responses = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = FileManagerConfig::default();
        assert_eq!(config.bucket_name, "s3fm-files");
        assert_eq!(config.secret_name, "s3fm-users");
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.secret_backend, SecretBackend::File);
        assert_eq!(config.users_file, "users.json");
        assert_eq!(config.gateway_listen, "0.0.0.0:8080");
        assert_eq!(config.default_region, "us-east-1");
        assert!(config.endpoint_url.is_none());
        assert!(config.decode_binary_responses);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_should_load_from_env() {
        let config = FileManagerConfig::from_env().expect("environment config");
        assert!(!config.gateway_listen.is_empty());
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = FileManagerConfig::builder()
            .bucket_name("team-files".into())
            .secret_name("team-users".into())
            .storage_backend(StorageBackend::S3)
            .secret_backend(SecretBackend::SecretsManager)
            .endpoint_url(Some("http://localhost:4566".into()))
            .decode_binary_responses(false)
            .build();

        assert_eq!(config.bucket_name, "team-files");
        assert_eq!(config.secret_name, "team-users");
        assert_eq!(config.storage_backend, StorageBackend::S3);
        assert_eq!(config.secret_backend, SecretBackend::SecretsManager);
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert!(!config.decode_binary_responses);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_should_parse_backends() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!("file".parse::<SecretBackend>().unwrap(), SecretBackend::File);
        assert_eq!(
            "SecretsManager".parse::<SecretBackend>().unwrap(),
            SecretBackend::SecretsManager
        );
    }

    #[test]
    fn test_should_reject_unknown_backends() {
        assert!(matches!(
            "gcs".parse::<StorageBackend>(),
            Err(ConfigError::UnknownStorageBackend(name)) if name == "gcs"
        ));
        assert!(matches!(
            "vault".parse::<SecretBackend>(),
            Err(ConfigError::UnknownSecretBackend(name)) if name == "vault"
        ));
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let json = serde_json::to_string(&FileManagerConfig::default()).expect("serialize");
        assert!(json.contains("bucketName"));
        assert!(json.contains("\"storageBackend\":\"memory\""));
        assert!(json.contains("\"secretBackend\":\"file\""));
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("no"));
        assert!(!parse_bool(""));
    }
}
