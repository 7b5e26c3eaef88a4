//! Settings resolved from the process environment.
//!
//! Everything external to the chain (service endpoints, credentials, model
//! identifiers) is supplied here. Resolution fails fast before any
//! invocation is accepted.

use std::env;
use std::time::Duration;

use crate::core::errors::PipelineError;

pub const DEFAULT_COMPLETION_BASE: &str = "https://api.groq.com/openai";
pub const DEFAULT_RAG_MODEL: &str = "openai/gpt-oss-120b";

const DEFAULT_COLLECTION: &str = "ecommerce_data";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub astra_endpoint: String,
    pub astra_token: String,
    pub astra_keyspace: String,
    pub astra_collection: String,
    pub groq_api_key: String,
    pub groq_api_base: String,
    pub rag_model: String,
    /// Applied to every outbound retrieval and completion request.
    pub request_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, PipelineError> {
        Ok(Settings {
            astra_endpoint: require("ASTRA_DB_API_ENDPOINT")?,
            astra_token: require("ASTRA_DB_APPLICATION_TOKEN")?,
            astra_keyspace: require("ASTRA_DB_KEYSPACE")?,
            astra_collection: env::var("ASTRA_DB_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_COLLECTION.to_string()),
            groq_api_key: require("GROQ_API_KEY")?,
            groq_api_base: env::var("GROQ_API_BASE")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_BASE.to_string()),
            rag_model: env::var("RAG_MODEL").unwrap_or_else(|_| DEFAULT_RAG_MODEL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs()?),
        })
    }
}

fn require(key: &str) -> Result<String, PipelineError> {
    env::var(key).map_err(|_| {
        PipelineError::Configuration(format!("missing required environment variable: {}", key))
    })
}

fn timeout_secs() -> Result<u64, PipelineError> {
    match env::var("REQUEST_TIMEOUT_SECS") {
        Ok(raw) => raw.parse().map_err(|_| {
            PipelineError::Configuration(format!(
                "REQUEST_TIMEOUT_SECS must be a positive integer, got '{}'",
                raw
            ))
        }),
        Err(_) => Ok(DEFAULT_TIMEOUT_SECS),
    }
}
