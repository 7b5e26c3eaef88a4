mod astra;

pub use astra::AstraRetriever;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::PipelineError;

/// A retrieved document. Read-only; never persisted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    /// Opaque mapping supplied by the retrieval service.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Document {
            content: content.into(),
            metadata: serde_json::Value::Null,
        }
    }
}

/// Opaque vector-retrieval service.
///
/// Results come back in the service's own relevance order (descending) and
/// are not re-sorted locally.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, PipelineError>;
}
