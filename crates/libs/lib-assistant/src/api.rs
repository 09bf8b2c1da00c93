//! # Assistant API Trait
//!
//! The remote primitives the adapters are built on. [`OpenAiClient`](crate::OpenAiClient)
//! talks to the hosted service; tests substitute a recording double.

use crate::types::{FileObject, FilePurpose, MessageList, MessageRole, Run, Thread, ThreadMessage};
use async_trait::async_trait;
use lib_core::Result;
use std::path::Path;

/// Thread, run, message and file primitives of the hosted assistant API.
///
/// Every failure is reported as [`AppError::Backend`](lib_core::AppError::Backend)
/// unless stated otherwise.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create an empty thread.
    async fn create_thread(&self) -> Result<Thread>;

    /// Append a message to a thread.
    async fn create_message(&self, thread_id: &str, role: MessageRole, content: &str) -> Result<ThreadMessage>;

    /// Start processing a thread with the given assistant.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// Fetch the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List the messages of a thread, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<MessageList>;

    /// Stream a local file to the service.
    async fn upload_file(&self, path: &Path, filename: &str, purpose: FilePurpose) -> Result<FileObject>;
}
