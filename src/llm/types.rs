use serde::{Deserialize, Serialize};

use crate::history::{Role, Turn};

/// One message in OpenAI-compatible wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        let role = match turn.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        ChatMessage {
            role: role.to_string(),
            content: turn.text.clone(),
        }
    }
}

/// Assemble the prompt: system instructions, then prior turns, then the
/// latest user message.
pub fn build_messages(system: &str, history: &[Turn], user_text: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history.iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(user_text));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_system_history_user_order() {
        let history = vec![Turn::user("hi"), Turn::assistant("hello")];
        let messages = build_messages("be helpful", &history, "what about shipping?");

        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(messages[0].content, "be helpful");
        assert_eq!(messages[3].content, "what about shipping?");
    }

    #[test]
    fn empty_history_yields_system_and_user_only() {
        let messages = build_messages("sys", &[], "q");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }
}
