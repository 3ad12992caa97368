//! The hyper `Service` fronting an [`EnvelopeHandler`].
//!
//! [`FileHttpService`] handles, in order:
//!
//! 1. Health check interception (`GET /_health`, `GET /health`)
//! 2. Request body collection
//! 3. Envelope construction ([`crate::request::to_envelope`])
//! 4. Dispatch to the [`EnvelopeHandler`]
//! 5. Envelope write-back ([`crate::response::to_http_response`])
//! 6. The `x-request-id` response header

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use s3fm_model::json::error_body;
use tracing::{debug, error};
use uuid::Uuid;

use crate::body::FileResponseBody;
use crate::handler::EnvelopeHandler;
use crate::request::to_envelope;
use crate::response::to_http_response;

/// Configuration for the HTTP adapter.
#[derive(Debug, Clone)]
pub struct FileHttpConfig {
    /// Send base64 response bodies as raw bytes.
    pub decode_binary_responses: bool,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            decode_binary_responses: true,
        }
    }
}

/// Hyper service wrapping an envelope handler.
#[derive(Debug)]
pub struct FileHttpService<H: EnvelopeHandler> {
    handler: Arc<H>,
    config: Arc<FileHttpConfig>,
}

impl<H: EnvelopeHandler> FileHttpService<H> {
    /// Create a service owning `handler`.
    #[must_use]
    pub fn new(handler: H, config: FileHttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a service from a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: FileHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: EnvelopeHandler> Clone for FileHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: EnvelopeHandler> Service<http::Request<Incoming>> for FileHttpService<H> {
    type Response = http::Response<FileResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let (parts, incoming) = req.into_parts();

            let response = if is_health_check(&parts.method, parts.uri.path()) {
                health_check_response()
            } else {
                match collect_body(incoming).await {
                    Ok(body) => {
                        process_request(&parts, body, handler.as_ref(), &config, &request_id).await
                    }
                    Err(err) => {
                        error!(error = %err, request_id, "failed to collect request body");
                        body_error_response()
                    }
                }
            };

            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Run a collected request through the handler.
pub async fn process_request<H: EnvelopeHandler>(
    parts: &http::request::Parts,
    body: Bytes,
    handler: &H,
    config: &FileHttpConfig,
    request_id: &str,
) -> http::Response<FileResponseBody> {
    debug!(method = %parts.method, uri = %parts.uri, request_id, "processing request");
    let envelope = to_envelope(parts, body, request_id);
    let response = handler.handle_envelope(envelope).await;
    to_http_response(response, config.decode_binary_responses)
}

async fn collect_body(incoming: Incoming) -> Result<Bytes, hyper::Error> {
    let collected = incoming.collect().await?;
    Ok(collected.to_bytes())
}

fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/health")
}

fn health_check_response() -> http::Response<FileResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(FileResponseBody::from_string(
            r#"{"status":"running","service":"s3fm"}"#,
        ))
        .expect("static health response should be valid")
}

fn body_error_response() -> http::Response<FileResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", "application/json")
        .body(FileResponseBody::from_string(error_body(
            "Failed to read request body",
        )))
        .expect("static error response should be valid")
}

fn add_common_headers(
    mut response: http::Response<FileResponseBody>,
    request_id: &str,
) -> http::Response<FileResponseBody> {
    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", hv);
    }
    response
}
