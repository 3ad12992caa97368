//! Request and response envelopes exchanged with the invocation transport.
//!
//! The field names follow the API Gateway REST proxy integration format, so a
//! Lambda event deserializes straight into a [`RequestEnvelope`] and a
//! [`ResponseEnvelope`] serializes into the reply the gateway expects:
//!
//! ```json
//! {
//!   "statusCode": 200,
//!   "headers": { "Access-Control-Allow-Origin": "*", "Content-Type": "application/zip" },
//!   "body": "UEsDBBQAAAAAAA...",
//!   "isBase64Encoded": true
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Content type of JSON bodies (lists and errors).
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type of single-file downloads.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Content type of folder downloads.
pub const CONTENT_TYPE_ZIP: &str = "application/zip";

/// CORS headers attached to every response, preflight included.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Expose-Headers", "*"),
];

/// Build a fresh header map holding only the CORS headers.
#[must_use]
pub fn cors_headers() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect()
}

/// An incoming request as delivered by the transport.
///
/// Absent `httpMethod` / `path` fields deserialize to empty strings, which
/// never match a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    /// HTTP method, e.g. `"GET"`.
    #[serde(default)]
    pub http_method: String,
    /// Request path, e.g. `"/prod/files/get"`.
    #[serde(default)]
    pub path: String,
    /// Query string parameters (`filename`, `prefix`).
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// Request headers, keyed by the name as sent.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Request body. Uploads carry base64 text here.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether the transport base64-encoded the body.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl RequestEnvelope {
    /// Create an envelope with the given method and path and nothing else.
    #[must_use]
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a query string parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a query string parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    /// Look up a header by its exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(name))
            .map(String::as_str)
    }
}

/// An outgoing response handed back to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers; always contains [`CORS_HEADERS`].
    pub headers: BTreeMap<String, String>,
    /// Response body, base64 text when `is_base64_encoded` is set.
    pub body: String,
    /// Whether `body` is base64-encoded binary.
    pub is_base64_encoded: bool,
}

impl ResponseEnvelope {
    /// A plain text response without a content type.
    #[must_use]
    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: cors_headers(),
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    /// A JSON response. `body` must already be serialized JSON text.
    #[must_use]
    pub fn json(status_code: u16, body: impl Into<String>) -> Self {
        Self::text(status_code, body).with_content_type(CONTENT_TYPE_JSON)
    }

    /// A binary response; the payload is base64-encoded into `body`.
    #[must_use]
    pub fn binary(status_code: u16, data: &[u8], content_type: &str) -> Self {
        Self {
            status_code,
            headers: cors_headers(),
            body: BASE64.encode(data),
            is_base64_encoded: true,
        }
        .with_content_type(content_type)
    }

    /// A response with an empty body.
    #[must_use]
    pub fn empty(status_code: u16) -> Self {
        Self::text(status_code, "")
    }

    fn with_content_type(mut self, content_type: &str) -> Self {
        self.headers
            .insert("Content-Type".to_owned(), content_type.to_owned());
        self
    }

    /// Look up a response header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The raw body bytes, decoding base64 when the body is binary.
    pub fn body_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        if self.is_base64_encoded {
            BASE64.decode(&self.body)
        } else {
            Ok(self.body.as_bytes().to_vec())
        }
    }
}
