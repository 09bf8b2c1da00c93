//! # WebSocket Handler
//!
//! `GET /api/ws` - upgrades to the realtime channel.
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:3000/api/ws');
//! ws.send(JSON.stringify({ event: 'sendMessage', data: 'What is 6 x 7?' }));
//! ws.onmessage = (e) => console.log(JSON.parse(e.data)); // { event: 'message', data: '42' }
//! ```
//!
//! Only registered when the environment is not `production`.

use crate::bridge::{run_session, ChatForwarder};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Upgrade the connection and hand it to a realtime session.
pub async fn realtime_websocket(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(forwarder): State<Arc<dyn ChatForwarder>>,
) -> Response {
    let client_id = Uuid::new_v4().to_string();
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let client_ip = headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| Some(addr.ip().to_string()));

    info!(
        client_id = %client_id,
        client_ip = ?client_ip,
        user_agent = ?user_agent,
        "[WS] CONNECT_ATTEMPT client_id={} ip={:?}",
        client_id,
        client_ip
    );

    ws.on_upgrade(move |socket| async move {
        let client_id_log = client_id.clone();
        let handle = tokio::spawn(run_session(socket, forwarder, client_id, client_ip));
        if let Err(e) = handle.await {
            error!(
                client_id = %client_id_log,
                error = ?e,
                "[WS] HANDLER_PANIC client_id={} error={:?}",
                client_id_log,
                e
            );
        }
    })
    .into_response()
}
