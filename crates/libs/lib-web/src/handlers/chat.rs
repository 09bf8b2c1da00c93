//! # Chat Handler
//!
//! `POST /api/chat`
//!
//! ```text
//! request:  { "message": "What is 6 x 7?" }
//! 200:      { "message": "42" }
//! 400:      { "error": "Invalid chat request." }
//! 500:      { "error": "An error occurred while processing your request." }
//! ```

use crate::services::RelayService;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use lib_core::error::{CHAT_FAILURE_MESSAGE, INVALID_CHAT_MESSAGE};
use lib_core::AppError;
use shared::dto::chat::{ChatRequest, ChatResponse};
use shared::utils::preview;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Relay one chat message and return the assistant's answer.
///
/// If the client disconnects before the answer arrives, the handler future is
/// dropped and the drop guard cancels the in-flight polling.
pub async fn chat(
    State(relay): State<Arc<RelayService>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            debug!("[CHAT] Rejected body: {}", rejection.body_text());
            return AppError::Validation(INVALID_CHAT_MESSAGE.to_string())
                .into_boundary_response(CHAT_FAILURE_MESSAGE);
        }
    };

    info!("[CHAT] Received message: {}", preview(&request.message, 40));

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match relay.submit_message(&request.message, &cancel).await {
        Ok(answer) => Json(ChatResponse { message: answer }).into_response(),
        Err(e) => e.into_boundary_response(CHAT_FAILURE_MESSAGE),
    }
}
