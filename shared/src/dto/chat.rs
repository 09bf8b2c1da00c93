//! # Chat Data Transfer Objects
//!
//! Bodies of `POST /api/chat` and the shared error body.

use serde::{Deserialize, Serialize};

/// `POST /api/chat` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// `POST /api/chat` success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Who wrote a conversation turn.
///
/// Older widget builds tag assistant turns as `ai`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "ai")]
    Assistant,
}

/// One line of the transcript the widget renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub text: String,
    pub sender: Sender,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_accepts_legacy_tag() {
        let turn: ConversationTurn = serde_json::from_str(r#"{"text":"42","sender":"ai"}"#).unwrap();
        assert_eq!(turn, ConversationTurn::assistant("42"));
        assert_eq!(
            serde_json::to_string(&turn).unwrap(),
            r#"{"text":"42","sender":"assistant"}"#
        );
    }

    #[test]
    fn test_unknown_sender_rejected() {
        assert!(serde_json::from_str::<ConversationTurn>(r#"{"text":"x","sender":"system"}"#).is_err());
    }
}
