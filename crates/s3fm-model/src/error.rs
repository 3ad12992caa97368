//! Typed failures of the file-manager handler.
//!
//! Every failure leaves the handler as a JSON body `{"error": "<message>"}`
//! with the status code of its [`FileErrorKind`].

use std::fmt;

use crate::envelope::ResponseEnvelope;
use crate::json::error_body;

/// Failure categories and their HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FileErrorKind {
    /// Missing or bad credentials (401).
    Unauthorized,
    /// A required query parameter is missing (400).
    ValidationFailed,
    /// The requested object does not exist (404).
    NotFound,
    /// No route matches the method and path (405).
    UnsupportedOperation,
    /// A storage call inside a delete operation failed (500).
    OperationFailed,
    /// Anything else (500).
    Internal,
}

impl FileErrorKind {
    /// Returns the short name of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::ValidationFailed => "ValidationFailed",
            Self::NotFound => "NotFound",
            Self::UnsupportedOperation => "UnsupportedOperation",
            Self::OperationFailed => "OperationFailed",
            Self::Internal => "Internal",
        }
    }

    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::Unauthorized => http::StatusCode::UNAUTHORIZED,
            Self::ValidationFailed => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::UnsupportedOperation => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::OperationFailed | Self::Internal => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handler failure carrying the message surfaced to the caller.
#[derive(Debug)]
pub struct FileError {
    /// The failure category.
    pub kind: FileErrorKind,
    /// Message placed in the `error` field of the response body.
    pub message: String,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl FileError {
    /// Create a new error with a custom message.
    #[must_use]
    pub fn with_message(kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The HTTP status code of this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        self.kind.status_code()
    }

    /// Render the error as a JSON response envelope.
    #[must_use]
    pub fn to_response(&self) -> ResponseEnvelope {
        ResponseEnvelope::json(self.status_code().as_u16(), error_body(&self.message))
    }

    // -- Convenience constructors --

    /// Authentication failed, for whatever reason.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::with_message(FileErrorKind::Unauthorized, "Unauthorized")
    }

    /// An upload arrived without a `filename` parameter.
    #[must_use]
    pub fn missing_filename() -> Self {
        Self::with_message(FileErrorKind::ValidationFailed, "Missing filename")
    }

    /// The object requested for download does not exist.
    #[must_use]
    pub fn file_not_found() -> Self {
        Self::with_message(FileErrorKind::NotFound, "File not found")
    }

    /// No route matched.
    #[must_use]
    pub fn unsupported_operation() -> Self {
        Self::with_message(FileErrorKind::UnsupportedOperation, "Unsupported operation")
    }

    /// A delete against storage failed.
    #[must_use]
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::with_message(FileErrorKind::OperationFailed, message)
    }

    /// Unclassified failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(FileErrorKind::Internal, message)
    }
}
