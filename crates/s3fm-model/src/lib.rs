//! Wire types for s3fm.
//!
//! - [`envelope`]: the request/response envelopes exchanged with the transport
//! - [`error`]: [`FileError`] and its status-code mapping
//! - [`operations`]: the [`FileOperation`] enum
//! - [`json`]: JSON text laid out the way existing clients expect

pub mod envelope;
pub mod error;
pub mod json;
pub mod operations;

pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use error::{FileError, FileErrorKind};
pub use operations::FileOperation;
