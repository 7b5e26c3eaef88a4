//! Per-session chat history.
//!
//! Sessions are created lazily on first reference and live for the process
//! lifetime. The store is injected into the chain at construction, so tests
//! and multiple independent chains can each own their own store, and an
//! evicting or external backend can be swapped in behind [`SessionStore`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a transcript. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Shared handle to one session's ordered transcript.
///
/// Cloning is cheap and shares the underlying turn list.
#[derive(Clone, Default)]
pub struct Transcript {
    turns: Arc<Mutex<Vec<Turn>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the turns at this moment.
    pub async fn snapshot(&self) -> Vec<Turn> {
        self.turns.lock().await.clone()
    }

    /// Append one completed exchange.
    ///
    /// Both turns are pushed under a single lock hold, so concurrent
    /// invocations on the same session can never interleave inside a pair.
    pub async fn append_exchange(&self, user_text: &str, assistant_text: &str) {
        let mut turns = self.turns.lock().await;
        turns.push(Turn::user(user_text));
        turns.push(Turn::assistant(assistant_text));
    }

    pub async fn len(&self) -> usize {
        self.turns.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.lock().await.is_empty()
    }

    /// Whether two handles refer to the same underlying transcript.
    pub fn same_session(&self, other: &Transcript) -> bool {
        Arc::ptr_eq(&self.turns, &other.turns)
    }
}

/// Process-lifetime mapping from session id to transcript.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the transcript for `session_id`, creating and registering an
    /// empty one on first reference. Never fails.
    async fn get_or_create(&self, session_id: &str) -> Transcript;
}

struct SessionEntry {
    transcript: Transcript,
    created_at: DateTime<Utc>,
}

/// In-memory session store.
///
/// Purely additive: no eviction, no size bound, no persistence. Long-running
/// deployments should put an evicting backend behind [`SessionStore`]
/// instead.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn created_at(&self, session_id: &str) -> Option<DateTime<Utc>> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .map(|entry| entry.created_at)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> Transcript {
        // The map lock makes first-reference creation atomic: two concurrent
        // calls for an unseen id observe the same entry.
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!("creating session {}", session_id);
                SessionEntry {
                    transcript: Transcript::new(),
                    created_at: Utc::now(),
                }
            })
            .transcript
            .clone()
    }
}
