use async_trait::async_trait;

use crate::error::Result;

/// An opaque text-completion backend.
///
/// One call is one request/response round trip with no streaming. Failures
/// are reported as a single `GenerationUnavailable` error with no partial
/// output. Implementations must not retry.
#[async_trait]
pub trait TextCompletion: Send + Sync + std::fmt::Debug {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
