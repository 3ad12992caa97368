//! [`ResponseEnvelope`] to HTTP response conversion.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::header::{HeaderName, HeaderValue};
use s3fm_model::ResponseEnvelope;
use s3fm_model::json::error_body;
use tracing::{error, warn};

use crate::body::FileResponseBody;

/// Write an envelope back as an HTTP response.
///
/// With `decode_binary` set, base64 bodies are sent as their raw bytes;
/// otherwise the base64 text is sent unchanged.
#[must_use]
pub fn to_http_response(
    envelope: ResponseEnvelope,
    decode_binary: bool,
) -> http::Response<FileResponseBody> {
    let body = if envelope.is_base64_encoded && decode_binary {
        match BASE64.decode(envelope.body.as_bytes()) {
            Ok(bytes) => FileResponseBody::from_bytes(bytes),
            Err(err) => {
                error!(error = %err, "response body is not valid base64");
                return internal_error_response(&err.to_string());
            }
        }
    } else {
        FileResponseBody::from_string(envelope.body)
    };

    let mut response = http::Response::new(body);
    *response.status_mut() = http::StatusCode::from_u16(envelope.status_code)
        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

    let headers = response.headers_mut();
    for (name, value) in &envelope.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "dropping invalid response header"),
        }
    }
    response
}

fn internal_error_response(message: &str) -> http::Response<FileResponseBody> {
    let mut response = http::Response::new(FileResponseBody::from_string(error_body(message)));
    *response.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
