use thiserror::Error;

/// Failure taxonomy for the pipeline.
///
/// The chain performs no local recovery: a failed external call aborts the
/// whole invocation and surfaces here. Retry and backoff policy belong to
/// the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A retrieval or completion call failed (network, auth, rate limit,
    /// malformed response).
    #[error("service error: {0}")]
    Service(String),
    /// Required external configuration is missing or invalid at startup.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PipelineError {
    pub fn service<E: std::fmt::Display>(err: E) -> Self {
        PipelineError::Service(err.to_string())
    }

    pub fn configuration<E: std::fmt::Display>(err: E) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}
