//! # Realtime Events
//!
//! Events carried over the realtime channel. Each WebSocket text frame holds
//! one JSON envelope:
//!
//! ```json
//! { "event": "sendMessage", "data": "ping" }
//! ```

use serde::{Deserialize, Serialize};

/// Events sent by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// A user message to relay to the assistant
    #[serde(rename = "sendMessage")]
    SendMessage(String),
}

/// Events sent to the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// The assistant's answer
    #[serde(rename = "message")]
    Message(String),
    /// A fixed, human-readable failure notice
    #[serde(rename = "error")]
    Error(String),
}

impl ClientEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl ServerEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
