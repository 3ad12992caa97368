//! The boundary between the HTTP adapter and request handling.

use std::future::Future;
use std::pin::Pin;

use s3fm_core::FileManager;
use s3fm_model::{RequestEnvelope, ResponseEnvelope};

/// Anything that turns a request envelope into a response envelope.
///
/// Boxed futures keep the trait object-safe.
pub trait EnvelopeHandler: Send + Sync + 'static {
    /// Handle one request. Failures are already folded into the response.
    fn handle_envelope(
        &self,
        request: RequestEnvelope,
    ) -> Pin<Box<dyn Future<Output = ResponseEnvelope> + Send + '_>>;
}

impl EnvelopeHandler for FileManager {
    fn handle_envelope(
        &self,
        request: RequestEnvelope,
    ) -> Pin<Box<dyn Future<Output = ResponseEnvelope> + Send + '_>> {
        Box::pin(self.handle(request))
    }
}
