//! # Assistant HTTP Client
//!
//! `reqwest` implementation of [`AssistantApi`] for the hosted assistants (v2) API.

use crate::api::AssistantApi;
use crate::types::{
    ApiErrorBody, CreateMessageRequest, CreateRunRequest, FileObject, FilePurpose, MessageList,
    MessageRole, Run, Thread, ThreadMessage,
};
use async_trait::async_trait;
use lib_core::{AppError, Config, Result};
use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument};

/// HTTP client for the hosted assistant API.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Create a new HTTP client with timeout configuration
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.openai_base_url, &config.openai_api_key, config.http_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    /// Send a request and decode a JSON body, turning transport errors and
    /// non-2xx statuses into [`AppError::Backend`].
    async fn send_json<T: DeserializeOwned>(&self, op: &'static str, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("{} request failed: {}", op, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(AppError::Backend(format!("{} returned {}: {}", op, status, message)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Backend(format!("{} response parse failed: {}", op, e)))
    }
}

#[async_trait]
impl AssistantApi for OpenAiClient {
    #[instrument(skip(self))]
    async fn create_thread(&self) -> Result<Thread> {
        let request = self.request(Method::POST, "/threads").json(&serde_json::json!({}));
        let thread: Thread = self.send_json("create_thread", request).await?;
        debug!(thread_id = %thread.id, "[ASSISTANT] Thread created");
        Ok(thread)
    }

    #[instrument(skip(self, content), fields(role = role.as_str(), content_len = content.len()))]
    async fn create_message(&self, thread_id: &str, role: MessageRole, content: &str) -> Result<ThreadMessage> {
        let request = self
            .request(Method::POST, &format!("/threads/{}/messages", thread_id))
            .json(&CreateMessageRequest { role, content });
        self.send_json("create_message", request).await
    }

    #[instrument(skip(self))]
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let request = self
            .request(Method::POST, &format!("/threads/{}/runs", thread_id))
            .json(&CreateRunRequest { assistant_id });
        let run: Run = self.send_json("create_run", request).await?;
        debug!(run_id = %run.id, status = %run.status, "[ASSISTANT] Run created");
        Ok(run)
    }

    #[instrument(skip(self))]
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let request = self.request(Method::GET, &format!("/threads/{}/runs/{}", thread_id, run_id));
        self.send_json("retrieve_run", request).await
    }

    #[instrument(skip(self))]
    async fn list_messages(&self, thread_id: &str) -> Result<MessageList> {
        let request = self.request(Method::GET, &format!("/threads/{}/messages", thread_id));
        self.send_json("list_messages", request).await
    }

    #[instrument(skip(self, path), fields(purpose = purpose.as_str()))]
    async fn upload_file(&self, path: &Path, filename: &str, purpose: FilePurpose) -> Result<FileObject> {
        let file = tokio::fs::File::open(path).await?;
        let length = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let part = multipart::Part::stream_with_length(body, length).file_name(filename.to_string());
        let form = multipart::Form::new()
            .text("purpose", purpose.as_str())
            .part("file", part);

        let request = self.request(Method::POST, "/files").multipart(form);
        let file: FileObject = self.send_json("upload_file", request).await?;
        debug!(file_id = %file.id, bytes = length, "[ASSISTANT] File stored");
        Ok(file)
    }
}
