//! AWS Lambda custom runtime loop.
//!
//! Polls the runtime API for invocations, feeds each event to the handler as
//! a [`RequestEnvelope`] and posts the [`ResponseEnvelope`] back. Events that
//! are not valid API Gateway proxy events are reported on the invocation's
//! error endpoint instead.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use s3fm_core::FileManager;
use s3fm_core::provider::REQUEST_ID_HEADER;
use s3fm_model::{RequestEnvelope, ResponseEnvelope};
use serde_json::json;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Environment variable holding the runtime API `host:port`.
pub const RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

const RUNTIME_API_VERSION: &str = "2018-06-01";
const INVOCATION_ID_HEADER: &str = "Lambda-Runtime-Aws-Request-Id";
const FUNCTION_ERROR_HEADER: &str = "Lambda-Runtime-Function-Error-Type";
const INVALID_EVENT_ERROR: &str = "Runtime.InvalidEvent";
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Client for the Lambda runtime API.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    client: Client,
    base_url: String,
}

impl RuntimeClient {
    /// Create a client for the runtime API at `api` (`host:port`).
    #[must_use]
    pub fn new(api: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("http://{api}/{RUNTIME_API_VERSION}/runtime/invocation"),
        }
    }

    fn next_url(&self) -> String {
        format!("{}/next", self.base_url)
    }

    fn response_url(&self, invocation_id: &str) -> String {
        format!("{}/{invocation_id}/response", self.base_url)
    }

    fn error_url(&self, invocation_id: &str) -> String {
        format!("{}/{invocation_id}/error", self.base_url)
    }

    /// Block until the next invocation arrives; returns its id and raw event.
    async fn next_invocation(&self) -> Result<(String, Vec<u8>)> {
        let resp = self
            .client
            .get(self.next_url())
            .send()
            .await
            .context("failed to poll for the next invocation")?
            .error_for_status()
            .context("runtime API rejected the next-invocation request")?;

        let invocation_id = resp
            .headers()
            .get(INVOCATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .with_context(|| format!("invocation is missing the {INVOCATION_ID_HEADER} header"))?;
        let event = resp.bytes().await.context("failed to read invocation event")?;
        Ok((invocation_id, event.to_vec()))
    }

    async fn post_response(&self, invocation_id: &str, response: &ResponseEnvelope) -> Result<()> {
        self.client
            .post(self.response_url(invocation_id))
            .json(response)
            .send()
            .await
            .context("failed to post invocation response")?
            .error_for_status()
            .context("runtime API rejected the invocation response")?;
        Ok(())
    }

    async fn post_error(&self, invocation_id: &str, error_type: &str, message: &str) -> Result<()> {
        self.client
            .post(self.error_url(invocation_id))
            .header(FUNCTION_ERROR_HEADER, error_type)
            .json(&error_payload(error_type, message))
            .send()
            .await
            .context("failed to post invocation error")?
            .error_for_status()
            .context("runtime API rejected the invocation error")?;
        Ok(())
    }
}

/// Body posted to the error endpoint.
fn error_payload(error_type: &str, message: &str) -> serde_json::Value {
    json!({
        "errorMessage": message,
        "errorType": error_type,
    })
}

/// Parse an invocation event, tagging it with the invocation id for logging
/// unless the caller already sent a request id.
fn decode_event(event: &[u8], invocation_id: &str) -> serde_json::Result<RequestEnvelope> {
    let envelope: RequestEnvelope = serde_json::from_slice(event)?;
    if envelope.header(REQUEST_ID_HEADER).is_some() {
        Ok(envelope)
    } else {
        Ok(envelope.with_header(REQUEST_ID_HEADER, invocation_id))
    }
}

/// Serve invocations until the process is stopped.
///
/// Transport failures talking to the runtime API are logged and retried;
/// the loop itself never returns successfully.
pub async fn run(api: &str, manager: FileManager) -> Result<()> {
    let runtime = RuntimeClient::new(api);
    info!(%api, "polling Lambda runtime API");

    loop {
        let (invocation_id, event) = match runtime.next_invocation().await {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!(error = format!("{e:#}"), "failed to fetch invocation, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };

        let span = info_span!("invocation", %invocation_id);
        let result = handle_invocation(&runtime, &manager, &invocation_id, &event)
            .instrument(span)
            .await;
        if let Err(e) = result {
            error!(%invocation_id, error = format!("{e:#}"), "failed to complete invocation");
        }
    }
}

async fn handle_invocation(
    runtime: &RuntimeClient,
    manager: &FileManager,
    invocation_id: &str,
    event: &[u8],
) -> Result<()> {
    match decode_event(event, invocation_id) {
        Ok(request) => {
            let response = manager.handle(request).await;
            debug!(status = response.status_code, "posting invocation response");
            runtime.post_response(invocation_id, &response).await
        }
        Err(e) => {
            warn!(error = %e, "invocation event is not a proxy request");
            runtime
                .post_error(invocation_id, INVALID_EVENT_ERROR, &e.to_string())
                .await
        }
    }
}
