//! Conversational RAG pipeline for e-commerce product Q&A.
//!
//! Given a question and the prior turns of a session, the chain rewrites
//! the question into a standalone search query, retrieves product context
//! from a vector store, generates a grounded answer with a language model
//! and records the exchange in per-session, in-memory history.
//!
//! The retrieval and completion services are opaque collaborators behind
//! [`retrieval::Retriever`] and [`llm::CompletionClient`]; HTTP adapters
//! for Astra DB and Groq are included.

pub mod chain;
pub mod config;
pub mod core;
pub mod history;
pub mod llm;
pub mod logging;
pub mod retrieval;

pub use crate::chain::{RagChain, DEFAULT_TOP_K};
pub use crate::core::errors::PipelineError;
pub use crate::history::{InMemorySessionStore, Role, SessionStore, Transcript, Turn};
pub use crate::llm::{CompletionClient, GroqClient};
pub use crate::retrieval::{AstraRetriever, Document, Retriever};
