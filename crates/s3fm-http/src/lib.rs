//! HTTP adapter for s3fm.
//!
//! Turns plain HTTP requests into [`RequestEnvelope`](s3fm_model::RequestEnvelope)s,
//! hands them to an [`EnvelopeHandler`](handler::EnvelopeHandler), and writes the
//! resulting envelope back.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> FileHttpService (hyper Service)
//!     -> Health check interception
//!     -> Body collection
//!     -> to_envelope (Title-Case headers, query, base64 for binary)
//!     -> EnvelopeHandler (FileManager)
//!     -> to_http_response (optional base64 decode)
//!     -> x-request-id
//!   <- HTTP Response
//! ```

pub mod body;
pub mod handler;
pub mod request;
pub mod response;
pub mod service;

pub use handler::EnvelopeHandler;
pub use service::{FileHttpConfig, FileHttpService};
