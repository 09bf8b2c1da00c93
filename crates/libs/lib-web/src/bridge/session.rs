//! # Realtime Session
//!
//! Drives one WebSocket connection.
//!
//! Three tasks share the connection:
//!
//! - **recv**: parses text frames into [`ClientEvent`]s and queues messages
//! - **worker**: forwards queued messages one at a time, so answers come back
//!   in the order the messages were sent
//! - **send**: writes [`ServerEvent`]s back to the socket
//!
//! Frames that are not a valid event are logged and dropped. When either side
//! of the socket ends, in-flight forwarding is cancelled.

use super::forwarder::ChatForwarder;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use lib_core::error::CHAT_FAILURE_MESSAGE;
use lib_core::AppError;
use shared::dto::realtime::{ClientEvent, ServerEvent};
use shared::utils::preview;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Pending messages per connection before the reader waits on the worker.
const QUEUE_CAPACITY: usize = 32;

/// Run a realtime session until the client disconnects.
pub async fn run_session(
    socket: WebSocket,
    forwarder: Arc<dyn ChatForwarder>,
    client_id: String,
    client_ip: Option<String>,
) {
    let (mut sender, mut receiver) = socket.split();
    let connection_start = Instant::now();
    let messages_sent = Arc::new(AtomicU64::new(0));
    let messages_received = Arc::new(AtomicU64::new(0));
    let cancel = CancellationToken::new();

    info!(
        client_id = %client_id,
        client_ip = ?client_ip,
        "[WS] CONNECTED client_id={} ip={:?}",
        client_id,
        client_ip
    );

    let (inbox_tx, mut inbox_rx) = mpsc::channel::<String>(QUEUE_CAPACITY);
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<ServerEvent>(QUEUE_CAPACITY);

    // Outgoing events → socket
    let client_id_send = client_id.clone();
    let messages_sent_send = Arc::clone(&messages_sent);
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbox_rx.recv().await {
            let json = event.to_json();
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                warn!(
                    client_id = %client_id_send,
                    error = %e,
                    "[WS] SEND_ERROR client_id={} error={}",
                    client_id_send,
                    e
                );
                break;
            }
            let count = messages_sent_send.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(
                client_id = %client_id_send,
                total_sent = count,
                "[WS] MESSAGE_SENT client_id={} total={}",
                client_id_send,
                count
            );
        }
    });

    // Queued messages → forwarder → outgoing events
    let client_id_work = client_id.clone();
    let worker_cancel = cancel.clone();
    let worker = tokio::spawn(async move {
        while let Some(text) = inbox_rx.recv().await {
            let reply = match forwarder.forward(&text, &worker_cancel).await {
                Ok(answer) => ServerEvent::Message(answer),
                Err(AppError::Cancelled(_)) => break,
                Err(e) => {
                    warn!(
                        client_id = %client_id_work,
                        kind = e.kind(),
                        error = %e,
                        "[WS] FORWARD_FAILED client_id={} error={}",
                        client_id_work,
                        e
                    );
                    ServerEvent::Error(CHAT_FAILURE_MESSAGE.to_string())
                }
            };
            if outbox_tx.send(reply).await.is_err() {
                break;
            }
        }
    });

    // Socket → queued messages
    let client_id_recv = client_id.clone();
    let messages_received_recv = Arc::clone(&messages_received);
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    messages_received_recv.fetch_add(1, Ordering::Relaxed);
                    match ClientEvent::from_json(text.as_str()) {
                        Ok(ClientEvent::SendMessage(message)) => {
                            info!(
                                client_id = %client_id_recv,
                                "[WS] MESSAGE_RECEIVED client_id={} message={}",
                                client_id_recv,
                                preview(&message, 40)
                            );
                            if inbox_tx.send(message).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            debug!(
                                client_id = %client_id_recv,
                                error = %e,
                                "[WS] IGNORED_FRAME client_id={} size={}",
                                client_id_recv,
                                text.as_str().len()
                            );
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    info!(
                        client_id = %client_id_recv,
                        "[WS] CLOSE_RECEIVED client_id={}",
                        client_id_recv
                    );
                    break;
                }
                Ok(_) => {
                    // ping/pong are answered by axum, binary frames are not part of the protocol
                }
                Err(e) => {
                    error!(
                        client_id = %client_id_recv,
                        error = %e,
                        "[WS] RECV_ERROR client_id={} error={}",
                        client_id_recv,
                        e
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        result = &mut send_task => {
            recv_task.abort();
            if let Err(e) = result {
                error!(client_id = %client_id, error = ?e, "[WS] SEND_TASK_ERROR client_id={}", client_id);
            }
        }
        result = &mut recv_task => {
            send_task.abort();
            if let Err(e) = result {
                error!(client_id = %client_id, error = ?e, "[WS] RECV_TASK_ERROR client_id={}", client_id);
            }
        }
    }
    cancel.cancel();
    worker.abort();

    let duration = connection_start.elapsed();
    info!(
        client_id = %client_id,
        client_ip = ?client_ip,
        duration_ms = duration.as_millis(),
        messages_sent = messages_sent.load(Ordering::Relaxed),
        messages_received = messages_received.load(Ordering::Relaxed),
        "[WS] DISCONNECTED client_id={} duration={:.2}s",
        client_id,
        duration.as_secs_f64()
    );
}
