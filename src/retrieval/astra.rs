//! Astra DB Data API adapter.
//!
//! Issues a JSON `find` with a `$vectorize` sort, so the query embedding is
//! computed server-side; this crate never handles embedding vectors.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

use super::{Document, Retriever};
use crate::config::Settings;
use crate::core::errors::PipelineError;

#[derive(Clone)]
pub struct AstraRetriever {
    collection_url: String,
    token: String,
    client: Client,
}

impl AstraRetriever {
    pub fn new(settings: &Settings) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(PipelineError::service)?;

        let collection_url = format!(
            "{}/api/json/v1/{}/{}",
            settings.astra_endpoint.trim_end_matches('/'),
            settings.astra_keyspace,
            settings.astra_collection,
        );

        Ok(AstraRetriever {
            collection_url,
            token: settings.astra_token.clone(),
            client,
        })
    }
}

fn parse_document(value: &Value) -> Document {
    let content = value
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string();

    // Everything except the content and the server-side embedding text is
    // carried along as opaque metadata.
    let metadata = match value {
        Value::Object(map) => {
            let rest: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| key.as_str() != "content" && key.as_str() != "$vectorize")
                .map(|(key, val)| (key.clone(), val.clone()))
                .collect();
            Value::Object(rest)
        }
        _ => Value::Null,
    };

    Document { content, metadata }
}

#[async_trait]
impl Retriever for AstraRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, PipelineError> {
        let body = json!({
            "find": {
                "sort": { "$vectorize": query },
                "options": { "limit": k },
            }
        });

        let res = self
            .client
            .post(&self.collection_url)
            .header("Token", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(PipelineError::service)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(PipelineError::Service(format!(
                "retrieval request failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(PipelineError::service)?;

        // The Data API reports command failures in-band with a 200 status.
        if let Some(errors) = payload.get("errors") {
            return Err(PipelineError::Service(format!(
                "retrieval request rejected: {}",
                errors
            )));
        }

        let documents = payload["data"]["documents"]
            .as_array()
            .map(|items| items.iter().map(parse_document).collect())
            .unwrap_or_default();

        Ok(documents)
    }
}
