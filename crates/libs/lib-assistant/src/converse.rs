//! # Assistant Adapter
//!
//! Turns one user message into one assistant answer:
//!
//! 1. create a thread
//! 2. append the message with role `user`
//! 3. start a run against the configured assistant
//! 4. poll the run until it completes ([`wait_for_completion`])
//! 5. list the thread's messages and take the first assistant text
//!
//! Every call gets a brand-new thread; nothing carries over between calls.

use crate::api::AssistantApi;
use crate::poll::{cancellable, wait_for_completion, PollPolicy};
use crate::types::{MessageContent, MessageList, MessageRole};
use lib_core::{AppError, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, Span};

/// One-shot question/answer adapter over [`AssistantApi`].
#[derive(Clone)]
pub struct AssistantAdapter {
    api: Arc<dyn AssistantApi>,
    assistant_id: String,
    poll: PollPolicy,
}

impl AssistantAdapter {
    pub fn new(api: Arc<dyn AssistantApi>, assistant_id: impl Into<String>, poll: PollPolicy) -> Self {
        Self {
            api,
            assistant_id: assistant_id.into(),
            poll,
        }
    }

    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    /// Ask the assistant `message` and return its answer.
    ///
    /// Steps run strictly in order. `cancel` aborts the call at the next
    /// suspension point with [`AppError::Cancelled`]; the remote thread and
    /// run are left as they are.
    #[instrument(skip_all, fields(message_len = message.len(), thread_id, run_id))]
    pub async fn converse(&self, message: &str, cancel: &CancellationToken) -> Result<String> {
        let api = self.api.as_ref();

        let thread = cancellable(cancel, api.create_thread()).await?;
        Span::current().record("thread_id", thread.id.as_str());

        cancellable(cancel, api.create_message(&thread.id, MessageRole::User, message)).await?;

        let run = cancellable(cancel, api.create_run(&thread.id, &self.assistant_id)).await?;
        Span::current().record("run_id", run.id.as_str());

        wait_for_completion(api, &thread.id, &run.id, self.poll, cancel).await?;

        let messages = cancellable(cancel, api.list_messages(&thread.id)).await?;
        let answer = extract_answer(&messages)?;

        info!(
            thread_id = %thread.id,
            run_id = %run.id,
            answer_len = answer.len(),
            "[ASSISTANT] Answer received"
        );
        Ok(answer)
    }
}

/// Text of the first content block of the first assistant-authored message.
///
/// Fails with [`AppError::Extraction`] when there is no assistant message,
/// its first block is not text, or the text is empty.
pub fn extract_answer(messages: &MessageList) -> Result<String> {
    let message = messages
        .data
        .iter()
        .find(|m| m.role == MessageRole::Assistant)
        .ok_or_else(|| AppError::Extraction("thread holds no assistant message".to_string()))?;

    match message.content.first() {
        Some(MessageContent::Text { text }) if !text.value.is_empty() => Ok(text.value.clone()),
        Some(MessageContent::Text { .. }) => Err(AppError::Extraction(format!(
            "assistant message {} has empty text",
            message.id
        ))),
        Some(MessageContent::Other) | None => Err(AppError::Extraction(format!(
            "assistant message {} does not start with a text block",
            message.id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAssistantApi, MockStep, RecordedCall};
    use crate::types::ThreadMessage;
    use std::time::Duration;

    fn adapter(api: Arc<MockAssistantApi>) -> AssistantAdapter {
        AssistantAdapter::new(api, "asst_test", PollPolicy::new(Duration::from_millis(1), 20))
    }

    #[tokio::test]
    async fn test_converse_call_sequence() {
        let api = Arc::new(MockAssistantApi::answering("hi there").with_pending_polls(2));
        let answer = adapter(api.clone())
            .converse("hello", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(answer, "hi there");
        assert_eq!(
            api.calls(),
            vec![
                RecordedCall::CreateThread,
                RecordedCall::CreateMessage {
                    thread_id: "thread_1".into(),
                    role: MessageRole::User,
                    content: "hello".into(),
                },
                RecordedCall::CreateRun {
                    thread_id: "thread_1".into(),
                    assistant_id: "asst_test".into(),
                },
                RecordedCall::RetrieveRun { thread_id: "thread_1".into(), run_id: "run_3".into() },
                RecordedCall::RetrieveRun { thread_id: "thread_1".into(), run_id: "run_3".into() },
                RecordedCall::RetrieveRun { thread_id: "thread_1".into(), run_id: "run_3".into() },
                RecordedCall::ListMessages { thread_id: "thread_1".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_each_call_creates_a_new_thread() {
        let api = Arc::new(MockAssistantApi::answering("42"));
        let adapter = adapter(api.clone());
        let cancel = CancellationToken::new();

        adapter.converse("hello", &cancel).await.unwrap();
        adapter.converse("hello", &cancel).await.unwrap();

        let threads: Vec<String> = api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCall::CreateMessage { thread_id, .. } => Some(thread_id),
                _ => None,
            })
            .collect();
        assert_eq!(threads.len(), 2);
        assert_ne!(threads[0], threads[1]);
    }

    #[tokio::test]
    async fn test_run_create_failure_stops_sequence() {
        let api = Arc::new(MockAssistantApi::answering("42").failing_on(MockStep::CreateRun));
        let err = adapter(api.clone())
            .converse("hello", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Backend(_)));
        assert!(!api.calls().iter().any(|c| matches!(c, RecordedCall::RetrieveRun { .. })));
    }

    #[tokio::test]
    async fn test_missing_answer_is_extraction_error() {
        let api = Arc::new(MockAssistantApi::silent());
        let err = adapter(api)
            .converse("hello", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let api = Arc::new(MockAssistantApi::answering("42"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = adapter(api.clone()).converse("hello", &cancel).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled(_)));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_extract_picks_first_assistant_message() {
        let messages = MessageList {
            data: vec![
                ThreadMessage {
                    id: "msg_u".into(),
                    role: MessageRole::User,
                    content: vec![MessageContent::text("question")],
                },
                ThreadMessage {
                    id: "msg_a2".into(),
                    role: MessageRole::Assistant,
                    content: vec![MessageContent::text("newest"), MessageContent::text("more")],
                },
                ThreadMessage {
                    id: "msg_a1".into(),
                    role: MessageRole::Assistant,
                    content: vec![MessageContent::text("older")],
                },
            ],
            has_more: false,
        };

        assert_eq!(extract_answer(&messages).unwrap(), "newest");
    }

    #[test]
    fn test_extract_rejects_non_text_block() {
        let messages = MessageList {
            data: vec![ThreadMessage {
                id: "msg_a".into(),
                role: MessageRole::Assistant,
                content: vec![MessageContent::Other, MessageContent::text("caption")],
            }],
            has_more: false,
        };

        assert!(matches!(extract_answer(&messages), Err(AppError::Extraction(_))));
    }
}
