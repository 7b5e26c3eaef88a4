//! The conversational RAG chain.
//!
//! Query contextualization, retrieval, document stuffing and answer
//! generation composed as one explicit sequential pipeline with
//! per-session history injection.

mod answerer;
mod context;
mod pipeline;
mod rewriter;

pub use answerer::AnswerGenerator;
pub use context::format_context;
pub use pipeline::{RagChain, DEFAULT_TOP_K};
pub use rewriter::QueryRewriter;
