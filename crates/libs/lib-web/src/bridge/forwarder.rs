//! # Chat Forwarders
//!
//! The seam between a realtime session and whatever answers chat messages.
//!
//! - [`HttpForwarder`] posts to the relay's own `POST /api/chat` endpoint at the
//!   configured deployment URL
//! - [`RelayService`] answers in-process without the HTTP hop

use crate::services::RelayService;
use async_trait::async_trait;
use lib_core::{AppError, Config, Result};
use shared::dto::chat::{ChatRequest, ChatResponse, ErrorResponse};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Something that turns one user message into one assistant answer.
#[async_trait]
pub trait ChatForwarder: Send + Sync {
    /// Forward `text` and wait for the answer.
    ///
    /// Returns [`AppError::Cancelled`] if `cancel` fires first.
    async fn forward(&self, text: &str, cancel: &CancellationToken) -> Result<String>;
}

/// Forwards messages to the relay's HTTP chat endpoint.
#[derive(Clone)]
pub struct HttpForwarder {
    http: reqwest::Client,
    chat_url: String,
}

impl HttpForwarder {
    /// Create a forwarder for the relay deployed at `deployment_url`.
    ///
    /// Only the connect phase is bounded here; the relay bounds its own
    /// run polling.
    pub fn new(deployment_url: &str, connect_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            chat_url: format!("{}/api/chat", deployment_url.trim_end_matches('/')),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.deployment_url, config.http_timeout())
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    async fn post_chat(&self, text: &str) -> Result<String> {
        let request = ChatRequest { message: text.to_string() };
        let response = self
            .http
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("relay request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(AppError::Backend(format!("relay returned {}: {}", status, detail)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("invalid relay response: {}", e)))?;
        Ok(body.message)
    }
}

#[async_trait]
impl ChatForwarder for HttpForwarder {
    async fn forward(&self, text: &str, cancel: &CancellationToken) -> Result<String> {
        debug!("[WS] Forwarding to {}", self.chat_url);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled("relay request abandoned".to_string())),
            result = self.post_chat(text) => result,
        }
    }
}

#[async_trait]
impl ChatForwarder for RelayService {
    async fn forward(&self, text: &str, cancel: &CancellationToken) -> Result<String> {
        self.submit_message(text, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_chat_url_from_deployment_url() {
        let forwarder = HttpForwarder::new("https://relay.example.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(forwarder.chat_url(), "https://relay.example.com/api/chat");
    }

    #[tokio::test]
    async fn test_forward_returns_answer() {
        let app = Router::new().route(
            "/api/chat",
            post(|Json(req): Json<ChatRequest>| async move {
                Json(ChatResponse { message: format!("echo: {}", req.message) })
            }),
        );
        let base = serve(app).await;
        let forwarder = HttpForwarder::new(&base, Duration::from_secs(1)).unwrap();

        let answer = forwarder.forward("ping", &CancellationToken::new()).await.unwrap();
        assert_eq!(answer, "echo: ping");
    }

    #[tokio::test]
    async fn test_forward_maps_error_status() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { error: "boom".to_string() }),
                )
            }),
        );
        let base = serve(app).await;
        let forwarder = HttpForwarder::new(&base, Duration::from_secs(1)).unwrap();

        let err = forwarder.forward("ping", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(ref msg) if msg.contains("boom")));
    }

    #[tokio::test]
    async fn test_forward_cancelled() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(ChatResponse { message: "late".to_string() })
            }),
        );
        let base = serve(app).await;
        let forwarder = HttpForwarder::new(&base, Duration::from_secs(1)).unwrap();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = forwarder.forward("ping", &cancel).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled(_)));
    }
}
