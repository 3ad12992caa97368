//! File-manager operation handlers.
//!
//! Each submodule adds `handle_*` methods to [`crate::provider::FileManager`].
//! Handlers receive an authenticated [`RequestContext`] and return an
//! [`OperationOutput`], which the provider turns into a response envelope.

pub mod folder;
pub mod list;
pub mod object;

use s3fm_model::json::to_compat_string;
use s3fm_model::{FileError, RequestEnvelope, ResponseEnvelope};

use crate::auth::Identity;
use crate::router::non_empty_param;

/// An authenticated request on its way to a handler.
#[derive(Debug)]
pub struct RequestContext<'a> {
    /// The caller.
    pub identity: Identity,
    /// The raw request.
    pub request: &'a RequestEnvelope,
}

impl<'a> RequestContext<'a> {
    /// Create a context.
    #[must_use]
    pub fn new(identity: Identity, request: &'a RequestEnvelope) -> Self {
        Self { identity, request }
    }

    /// The caller's root folder.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.identity.root_folder
    }

    /// Non-empty `filename` query parameter.
    #[must_use]
    pub fn filename(&self) -> Option<&'a str> {
        non_empty_param(self.request, "filename")
    }

    /// Non-empty `prefix` query parameter.
    #[must_use]
    pub fn prefix(&self) -> Option<&'a str> {
        non_empty_param(self.request, "prefix")
    }
}

/// What a handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutput {
    /// `200` with an empty body (preflight).
    Empty,
    /// `200` with a plain-text message.
    Message(String),
    /// `200` with a JSON array of names.
    Names(Vec<String>),
    /// `200` with base64-encoded bytes.
    Binary {
        /// Raw bytes.
        data: Vec<u8>,
        /// `Content-Type` of the bytes.
        content_type: &'static str,
    },
}

impl OperationOutput {
    /// Render as a `200` response.
    ///
    /// # Errors
    ///
    /// Fails only if a name list cannot be serialized.
    pub fn into_response(self) -> Result<ResponseEnvelope, FileError> {
        Ok(match self {
            Self::Empty => ResponseEnvelope::empty(200),
            Self::Message(message) => ResponseEnvelope::text(200, message),
            Self::Names(names) => {
                let body = to_compat_string(&names)
                    .map_err(|e| FileError::internal(e.to_string()).with_source(e))?;
                ResponseEnvelope::json(200, body)
            }
            Self::Binary { data, content_type } => {
                ResponseEnvelope::binary(200, &data, content_type)
            }
        })
    }
}
