use std::sync::Arc;

use crate::core::errors::PipelineError;
use crate::history::Turn;
use crate::llm::CompletionClient;

const QA_SYSTEM_PROMPT: &str = "You are an e-commerce bot answering product-related queries.\n\
Use the following pieces of retrieved context to answer the question.\n\
If you don't know the answer, say that you don't know.\n\n";

/// Generates the final answer grounded in retrieved context.
pub struct AnswerGenerator {
    completion: Arc<dyn CompletionClient>,
}

impl AnswerGenerator {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        AnswerGenerator { completion }
    }

    /// Answer the question from the stuffed context and the conversation.
    ///
    /// The "I don't know" behavior is delegated to the model's instruction
    /// following; no fallback answer is synthesized here and the generated
    /// text is returned verbatim.
    pub async fn answer(
        &self,
        context: &str,
        history: &[Turn],
        user_text: &str,
    ) -> Result<String, PipelineError> {
        let system = format!("{}{}", QA_SYSTEM_PROMPT, context);
        self.completion.complete(&system, history, user_text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    /// Hands back the system prompt so tests can see the interpolation.
    struct ReflectSystem;

    #[async_trait]
    impl CompletionClient for ReflectSystem {
        async fn complete(
            &self,
            system: &str,
            _history: &[Turn],
            _user_text: &str,
        ) -> Result<String, PipelineError> {
            Ok(system.to_string())
        }
    }

    #[tokio::test]
    async fn context_is_interpolated_into_the_instruction() {
        let answerer = AnswerGenerator::new(Arc::new(ReflectSystem));
        let seen = answerer
            .answer("Product X has a 2-year warranty.", &[], "warranty?")
            .await
            .unwrap();

        assert!(seen.starts_with("You are an e-commerce bot"));
        assert!(seen.ends_with("Product X has a 2-year warranty."));
        assert!(seen.contains("say that you don't know"));
    }
}
