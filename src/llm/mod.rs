mod groq;
mod provider;
pub mod types;

pub use groq::GroqClient;
pub use provider::CompletionClient;
