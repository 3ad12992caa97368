//! Integration tests for the s3fm server.
//!
//! These tests require a running s3fm server in HTTP mode at
//! `localhost:8080`, with a users file that contains the test user. They are
//! marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! echo '{"it": {"password": "it-pass", "root_folder": "it/"}}' > users.json
//! S3FM_USERS_FILE=users.json cargo run -p s3fm-server &
//! cargo test -p s3fm-integration -- --ignored
//! ```

use std::sync::Once;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("S3FM_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Username the tests authenticate as.
#[must_use]
pub fn test_user() -> String {
    std::env::var("S3FM_TEST_USER").unwrap_or_else(|_| "it".to_owned())
}

/// Password of [`test_user`].
#[must_use]
pub fn test_password() -> String {
    std::env::var("S3FM_TEST_PASSWORD").unwrap_or_else(|_| "it-pass".to_owned())
}

/// Build an HTTP client.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// URL of an endpoint path on the server.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", endpoint_url())
}

/// `Authorization` header value for the given credentials.
#[must_use]
pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{password}")))
}

/// `Authorization` header value for the test user.
#[must_use]
pub fn test_auth() -> String {
    basic_auth(&test_user(), &test_password())
}

/// A unique folder name so concurrent tests don't collide.
#[must_use]
pub fn test_folder(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}/")
}

/// Upload `data` as `filename` for the test user.
pub async fn upload(client: &reqwest::Client, filename: &str, data: &[u8]) {
    let resp = client
        .put(url("/put"))
        .query(&[("filename", filename)])
        .header("Authorization", test_auth())
        .body(BASE64.encode(data))
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to upload {filename}: {e}"));
    assert_eq!(resp.status(), 200, "upload {filename}");
}

/// Delete a folder and everything under it. Errors are ignored.
pub async fn cleanup_folder(client: &reqwest::Client, prefix: &str) {
    let _ = client
        .delete(url("/delete-folder"))
        .query(&[("prefix", prefix)])
        .header("Authorization", test_auth())
        .send()
        .await;
}

#[cfg(test)]
mod test_auth;
#[cfg(test)]
mod test_files;
#[cfg(test)]
mod test_folders;
