//! # Recording API Double
//!
//! In-memory [`AssistantApi`] that records every call in order and answers
//! from a scripted configuration. Available to other crates through the
//! `test-util` feature.

use crate::api::AssistantApi;
use crate::types::{
    FileObject, FilePurpose, MessageContent, MessageList, MessageRole, Run, RunStatus, Thread,
    ThreadMessage,
};
use async_trait::async_trait;
use lib_core::{AppError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Remote primitive a mock can be told to fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStep {
    CreateThread,
    CreateMessage,
    CreateRun,
    RetrieveRun,
    ListMessages,
    UploadFile,
}

/// One call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    CreateThread,
    CreateMessage { thread_id: String, role: MessageRole, content: String },
    CreateRun { thread_id: String, assistant_id: String },
    RetrieveRun { thread_id: String, run_id: String },
    ListMessages { thread_id: String },
    UploadFile { path: PathBuf, filename: String, purpose: FilePurpose, contents: Vec<u8> },
}

#[derive(Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    next_id: u64,
    polls: HashMap<String, u32>,
    user_messages: HashMap<String, Vec<String>>,
}

/// Scripted, recording implementation of [`AssistantApi`].
pub struct MockAssistantApi {
    answer: Option<String>,
    pending_polls: u32,
    final_status: RunStatus,
    fail_on: Option<MockStep>,
    file_id: String,
    call_delay: Duration,
    state: Mutex<MockState>,
}

impl MockAssistantApi {
    /// A mock whose runs complete on the first check and whose threads hold `answer`.
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            pending_polls: 0,
            final_status: RunStatus::Completed,
            fail_on: None,
            file_id: "file_123".to_string(),
            call_delay: Duration::ZERO,
            state: Mutex::new(MockState::default()),
        }
    }

    /// A mock whose threads never receive an assistant message.
    pub fn silent() -> Self {
        Self {
            answer: None,
            ..Self::answering("")
        }
    }

    /// Report `in_progress` for the first `polls` status checks of each run.
    pub fn with_pending_polls(mut self, polls: u32) -> Self {
        self.pending_polls = polls;
        self
    }

    /// Status reported once the pending checks are used up.
    pub fn with_final_status(mut self, status: RunStatus) -> Self {
        self.final_status = status;
        self
    }

    pub fn failing_on(mut self, step: MockStep) -> Self {
        self.fail_on = Some(step);
        self
    }

    pub fn with_file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = file_id.into();
        self
    }

    /// Sleep this long inside every call.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// Snapshot of the calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn enter(&self, step: MockStep, call: RecordedCall) -> Result<()> {
        if !self.call_delay.is_zero() {
            tokio::time::sleep(self.call_delay).await;
        }
        self.lock().calls.push(call);
        if self.fail_on == Some(step) {
            return Err(AppError::Backend(format!("mock failure on {:?}", step)));
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        format!("{}_{}", prefix, state.next_id)
    }
}

#[async_trait]
impl AssistantApi for MockAssistantApi {
    async fn create_thread(&self) -> Result<Thread> {
        self.enter(MockStep::CreateThread, RecordedCall::CreateThread).await?;
        Ok(Thread { id: self.next_id("thread") })
    }

    async fn create_message(&self, thread_id: &str, role: MessageRole, content: &str) -> Result<ThreadMessage> {
        self.enter(
            MockStep::CreateMessage,
            RecordedCall::CreateMessage {
                thread_id: thread_id.to_string(),
                role,
                content: content.to_string(),
            },
        )
        .await?;

        self.lock()
            .user_messages
            .entry(thread_id.to_string())
            .or_default()
            .push(content.to_string());

        Ok(ThreadMessage {
            id: self.next_id("msg"),
            role,
            content: vec![MessageContent::text(content)],
        })
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        self.enter(
            MockStep::CreateRun,
            RecordedCall::CreateRun {
                thread_id: thread_id.to_string(),
                assistant_id: assistant_id.to_string(),
            },
        )
        .await?;

        Ok(Run {
            id: self.next_id("run"),
            thread_id: thread_id.to_string(),
            status: RunStatus::Queued,
            last_error: None,
        })
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.enter(
            MockStep::RetrieveRun,
            RecordedCall::RetrieveRun {
                thread_id: thread_id.to_string(),
                run_id: run_id.to_string(),
            },
        )
        .await?;

        let polls = {
            let mut state = self.lock();
            let count = state.polls.entry(run_id.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        let status = if polls > self.pending_polls {
            self.final_status
        } else {
            RunStatus::InProgress
        };

        Ok(Run {
            id: run_id.to_string(),
            thread_id: thread_id.to_string(),
            status,
            last_error: None,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<MessageList> {
        self.enter(
            MockStep::ListMessages,
            RecordedCall::ListMessages { thread_id: thread_id.to_string() },
        )
        .await?;

        // Newest first, like the hosted API.
        let mut data = Vec::new();
        if let Some(answer) = &self.answer {
            data.push(ThreadMessage {
                id: self.next_id("msg"),
                role: MessageRole::Assistant,
                content: vec![MessageContent::text(answer.clone())],
            });
        }
        let user_messages = self.lock().user_messages.get(thread_id).cloned().unwrap_or_default();
        for text in user_messages.into_iter().rev() {
            data.push(ThreadMessage {
                id: self.next_id("msg"),
                role: MessageRole::User,
                content: vec![MessageContent::text(text)],
            });
        }

        Ok(MessageList { data, has_more: false })
    }

    async fn upload_file(&self, path: &Path, filename: &str, purpose: FilePurpose) -> Result<FileObject> {
        let contents = tokio::fs::read(path).await?;
        let size = contents.len() as u64;
        self.enter(
            MockStep::UploadFile,
            RecordedCall::UploadFile {
                path: path.to_path_buf(),
                filename: filename.to_string(),
                purpose,
                contents,
            },
        )
        .await?;

        Ok(FileObject {
            id: self.file_id.clone(),
            filename: Some(filename.to_string()),
            bytes: Some(size),
            purpose: Some(purpose.as_str().to_string()),
        })
    }
}
