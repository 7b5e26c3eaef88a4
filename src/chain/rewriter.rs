use std::sync::Arc;

use crate::core::errors::PipelineError;
use crate::history::Turn;
use crate::llm::CompletionClient;

const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context in the chat history, \
formulate a standalone question which can be understood \
without the chat history. Do NOT answer the question, \
just reformulate it if needed and otherwise return it as is.";

/// Rewrites a conversational question into a standalone search query.
pub struct QueryRewriter {
    completion: Arc<dyn CompletionClient>,
}

impl QueryRewriter {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        QueryRewriter { completion }
    }

    /// Produce a standalone query from the history and the latest question.
    ///
    /// With an empty history the instruction makes the model return the
    /// question as is; that is an emergent property of the prompt, not
    /// special-cased here. The generated text is used verbatim.
    pub async fn rewrite(&self, history: &[Turn], user_text: &str) -> Result<String, PipelineError> {
        let query = self
            .completion
            .complete(CONTEXTUALIZE_SYSTEM_PROMPT, history, user_text)
            .await?;
        tracing::debug!("rewrote question into search query: {}", query);
        Ok(query)
    }
}
