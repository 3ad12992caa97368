//! HTTP request to [`RequestEnvelope`] conversion.
//!
//! The envelope mirrors what an API gateway proxy integration delivers:
//! header names in `Title-Case`, single-valued query parameters, and a
//! string body that is base64-encoded when the raw bytes are not UTF-8.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use s3fm_model::RequestEnvelope;

pub use s3fm_core::provider::REQUEST_ID_HEADER;

/// Re-case a header name: `content-type` becomes `Content-Type`.
#[must_use]
pub fn title_case(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a query string. Later duplicates win; no query gives `None`.
#[must_use]
pub fn parse_query(query: Option<&str>) -> Option<HashMap<String, String>> {
    let query = query.filter(|q| !q.is_empty())?;
    Some(
        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect(),
    )
}

/// Build the envelope for a request whose body has been collected.
///
/// Repeated headers are joined with `", "`.
#[must_use]
pub fn to_envelope(parts: &http::request::Parts, body: Bytes, request_id: &str) -> RequestEnvelope {
    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in &parts.headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(title_case(name.as_str()))
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_owned());
    }
    headers.insert(REQUEST_ID_HEADER.to_owned(), request_id.to_owned());

    let (body, is_base64_encoded) = if body.is_empty() {
        (None, false)
    } else {
        match std::str::from_utf8(&body) {
            Ok(text) => (Some(text.to_owned()), false),
            Err(_) => (Some(BASE64.encode(&body)), true),
        }
    };

    RequestEnvelope {
        http_method: parts.method.as_str().to_owned(),
        path: parts.uri.path().to_owned(),
        query_string_parameters: parse_query(parts.uri.query()),
        headers: Some(headers),
        body,
        is_base64_encoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> http::request::Parts {
        let mut builder = http::Request::builder().method("PUT").uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_should_title_case_header_names() {
        assert_eq!(title_case("authorization"), "Authorization");
        assert_eq!(title_case("content-type"), "Content-Type");
        assert_eq!(title_case("x-request-id"), "X-Request-Id");
        assert_eq!(title_case("X-AMZ-DATE"), "X-Amz-Date");
    }

    #[test]
    fn test_should_parse_query_parameters() {
        let query = parse_query(Some("filename=a%20b.txt&prefix=docs%2F&filename=c.txt")).unwrap();
        assert_eq!(query["filename"], "c.txt");
        assert_eq!(query["prefix"], "docs/");
        assert!(parse_query(None).is_none());
        assert!(parse_query(Some("")).is_none());
    }

    #[test]
    fn test_should_build_envelope_with_text_body() {
        let parts = parts(
            "/prod/put?filename=a.txt",
            &[("authorization", "Basic YWxpY2U6cHcx")],
        );
        let env = to_envelope(&parts, Bytes::from_static(b"aGk="), "req-1");
        assert_eq!(env.http_method, "PUT");
        assert_eq!(env.path, "/prod/put");
        assert_eq!(env.query_param("filename"), Some("a.txt"));
        assert_eq!(env.header("Authorization"), Some("Basic YWxpY2U6cHcx"));
        assert_eq!(env.header(REQUEST_ID_HEADER), Some("req-1"));
        assert_eq!(env.body.as_deref(), Some("aGk="));
        assert!(!env.is_base64_encoded);
    }

    #[test]
    fn test_should_base64_encode_binary_body() {
        let parts = parts("/put", &[]);
        let env = to_envelope(&parts, Bytes::from_static(&[0xff, 0x00]), "req-2");
        assert_eq!(env.body.as_deref(), Some("/wA="));
        assert!(env.is_base64_encoded);
    }

    #[test]
    fn test_should_omit_empty_body() {
        let env = to_envelope(&parts("/list", &[]), Bytes::new(), "req-3");
        assert!(env.body.is_none());
        assert!(env.query_string_parameters.is_none());
    }

    #[test]
    fn test_should_join_repeated_headers() {
        let parts = parts("/list", &[("accept", "text/plain"), ("accept", "application/json")]);
        let env = to_envelope(&parts, Bytes::new(), "req-4");
        assert_eq!(env.header("Accept"), Some("text/plain, application/json"));
    }
}
