//! AWS SDK collaborators for s3fm.
//!
//! - [`S3ObjectStore`]: the bucket, through `aws-sdk-s3`
//! - [`SecretsManagerStore`]: the user directory secret, through
//!   `aws-sdk-secretsmanager`
//! - [`load_sdk_config`]: shared SDK configuration for both clients

pub mod s3;
pub mod secretsmanager;

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub use s3::S3ObjectStore;
pub use secretsmanager::SecretsManagerStore;

/// Load the shared SDK configuration.
///
/// Credentials come from the default provider chain. `endpoint_url`
/// overrides the service endpoint for every client built from the result.
pub async fn load_sdk_config(region: &str, endpoint_url: Option<&str>) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_owned()));
    if let Some(endpoint) = endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

/// Render an SDK failure the way AWS CLIs do:
/// `An error occurred (<code>) when calling the <operation> operation: <message>`.
///
/// Falls back to `fallback` when the service sent no error code.
pub(crate) fn error_text(
    operation: &str,
    code: Option<&str>,
    message: Option<&str>,
    fallback: impl FnOnce() -> String,
) -> String {
    match code {
        Some(code) => format!(
            "An error occurred ({code}) when calling the {operation} operation: {}",
            message.unwrap_or("Unknown")
        ),
        None => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_format_coded_errors() {
        let text = error_text("DeleteObject", Some("AccessDenied"), Some("Access Denied"), || {
            unreachable!()
        });
        assert_eq!(
            text,
            "An error occurred (AccessDenied) when calling the DeleteObject operation: Access Denied"
        );
    }

    #[test]
    fn test_should_fall_back_without_code() {
        let text = error_text("GetObject", None, None, || "dispatch failure".to_owned());
        assert_eq!(text, "dispatch failure");
    }

    #[tokio::test]
    async fn test_should_load_sdk_config_with_endpoint() {
        let config = load_sdk_config("eu-west-1", Some("http://localhost:4566")).await;
        assert_eq!(
            config.region().map(ToString::to_string),
            Some("eu-west-1".to_owned())
        );
        assert_eq!(config.endpoint_url(), Some("http://localhost:4566"));
    }
}
