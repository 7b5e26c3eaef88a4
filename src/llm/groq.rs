use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::CompletionClient;
use super::types::build_messages;
use crate::config::Settings;
use crate::core::errors::PipelineError;
use crate::history::Turn;

pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Chat-completion adapter for Groq's OpenAI-compatible API.
#[derive(Clone)]
pub struct GroqClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    client: Client,
}

impl GroqClient {
    pub fn new(settings: &Settings) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(PipelineError::service)?;

        Ok(GroqClient {
            base_url: settings.groq_api_base.trim_end_matches('/').to_string(),
            api_key: settings.groq_api_key.clone(),
            model: settings.rag_model.clone(),
            temperature: DEFAULT_TEMPERATURE,
            client,
        })
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(
        &self,
        system: &str,
        history: &[Turn],
        user_text: &str,
    ) -> Result<String, PipelineError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let body = json!({
            "model": self.model,
            "messages": build_messages(system, history, user_text),
            "temperature": self.temperature,
            "stream": false,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(PipelineError::service)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(PipelineError::Service(format!(
                "completion request failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(PipelineError::service)?;

        // Raw model output is passed through unchanged, even when empty.
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }
}
