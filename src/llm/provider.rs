use async_trait::async_trait;

use crate::core::errors::PipelineError;
use crate::history::Turn;

/// Opaque text-completion service.
///
/// Implementations must form the underlying prompt in system / history /
/// user structural order. Retries, if any, are the client's concern; the
/// chain never retries.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        history: &[Turn],
        user_text: &str,
    ) -> Result<String, PipelineError>;
}
