//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the chat widget and the relay backend.
//! All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::chat`]**: `POST /api/chat` bodies, error bodies and conversation turns
//!   - **[`dto::upload`]**: `POST /api/upload` response
//!   - **[`dto::realtime`]**: events exchanged over the realtime channel
//! - **[`utils`]**: Shared utility functions
//!
//! ## Wire Format
//!
//! Field names follow what the widget already sends and expects:
//! `{ "message": ... }`, `{ "fileId": ... }`, `{ "error": ... }`, and realtime
//! frames shaped `{ "event": "sendMessage", "data": "..." }`.
//!
//! ```rust
//! use shared::dto::chat::ChatRequest;
//!
//! let request: ChatRequest = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
//! assert_eq!(request.message, "hello");
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
