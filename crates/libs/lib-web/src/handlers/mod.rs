//! # HTTP Request Handlers
//!
//! Axum handlers for the relay's public surface. Handlers only translate
//! between HTTP and the [`crate::services::RelayService`]; they never talk to
//! the hosted API directly.
//!
//! ## Handler Modules
//!
//! - **[`chat`]**: `POST /api/chat` - relay one message, return one answer
//! - **[`upload`]**: `POST /api/upload` - stream a file through to the assistant
//! - **[`websocket`]**: `GET /api/ws` - realtime channel (non-production only)
//!
//! ## Error Handling
//!
//! Every failure is rendered as `{ "error": "..." }`. Client mistakes keep
//! their message and a 400 status; anything else becomes a 500 with the
//! endpoint's fixed message (see [`lib_core::AppError::into_boundary_response`]).

pub mod chat;
pub mod upload;
pub mod websocket;
