//! Request routing.
//!
//! Routes match on the HTTP method and a path *suffix*, so `/prod/get` and
//! `/anything/get` both reach `GetObject`. The table is checked top to
//! bottom; a route whose guard fails is skipped, and a request no route
//! accepts is unsupported.

use s3fm_model::{FileOperation, RequestEnvelope};

/// Extra condition a route places on the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGuard {
    /// No condition.
    Always,
    /// `filename` must be present and non-empty.
    Filename,
    /// `prefix` must be present and non-empty.
    Prefix,
}

impl RouteGuard {
    fn accepts(self, request: &RequestEnvelope) -> bool {
        match self {
            Self::Always => true,
            Self::Filename => non_empty_param(request, "filename").is_some(),
            Self::Prefix => non_empty_param(request, "prefix").is_some(),
        }
    }
}

/// One routing table entry.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    /// Exact HTTP method.
    pub method: &'static str,
    /// Path suffix.
    pub suffix: &'static str,
    /// Query condition.
    pub guard: RouteGuard,
    /// Operation dispatched on match.
    pub operation: FileOperation,
}

impl Route {
    /// Whether this route accepts `request`.
    #[must_use]
    pub fn matches(&self, request: &RequestEnvelope) -> bool {
        request.http_method == self.method
            && request.path.ends_with(self.suffix)
            && self.guard.accepts(request)
    }
}

/// The routing table, in match order.
pub const ROUTES: [Route; 7] = [
    Route {
        method: "PUT",
        suffix: "/put",
        guard: RouteGuard::Always,
        operation: FileOperation::PutObject,
    },
    Route {
        method: "GET",
        suffix: "/get",
        guard: RouteGuard::Filename,
        operation: FileOperation::GetObject,
    },
    Route {
        method: "GET",
        suffix: "/list",
        guard: RouteGuard::Always,
        operation: FileOperation::ListFolders,
    },
    Route {
        method: "GET",
        suffix: "/list-files",
        guard: RouteGuard::Always,
        operation: FileOperation::ListFiles,
    },
    Route {
        method: "GET",
        suffix: "/download-folder",
        guard: RouteGuard::Prefix,
        operation: FileOperation::DownloadFolder,
    },
    Route {
        method: "DELETE",
        suffix: "/delete",
        guard: RouteGuard::Filename,
        operation: FileOperation::DeleteObject,
    },
    Route {
        method: "DELETE",
        suffix: "/delete-folder",
        guard: RouteGuard::Prefix,
        operation: FileOperation::DeleteFolder,
    },
];

/// Whether the request is a CORS preflight (answered before auth).
#[must_use]
pub fn is_preflight(request: &RequestEnvelope) -> bool {
    request.http_method == "OPTIONS"
}

/// Resolve the operation for an authenticated request.
///
/// Returns `None` when nothing matches.
#[must_use]
pub fn resolve_operation(request: &RequestEnvelope) -> Option<FileOperation> {
    if is_preflight(request) {
        return Some(FileOperation::Preflight);
    }
    ROUTES
        .iter()
        .find(|route| route.matches(request))
        .map(|route| route.operation)
}

/// A query parameter, treating an empty value as absent.
#[must_use]
pub fn non_empty_param<'a>(request: &'a RequestEnvelope, name: &str) -> Option<&'a str> {
    request.query_param(name).filter(|v| !v.is_empty())
}
