//! # Assistant Library
//!
//! Integration with the hosted assistant API.
//!
//! ## Layers
//!
//! - [`api`]: the [`AssistantApi`] trait, one method per remote primitive
//! - [`client`]: [`OpenAiClient`], the `reqwest` implementation of that trait
//! - [`types`]: wire types for threads, runs, messages and files
//! - [`poll`]: bounded, cancellable wait for a run to finish
//! - [`converse`]: [`AssistantAdapter`], one question in, one answer out
//! - [`upload`]: [`StagedUpload`] and [`UploadAdapter`], file passthrough with scoped cleanup
//!
//! ```text
//! AssistantAdapter::converse
//!     → create_thread → create_message(user) → create_run
//!     → retrieve_run ... until completed (PollPolicy)
//!     → list_messages → first assistant text
//! ```

pub mod api;
pub mod client;
pub mod converse;
pub mod poll;
pub mod types;
pub mod upload;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use api::AssistantApi;
pub use client::OpenAiClient;
pub use converse::{extract_answer, AssistantAdapter};
pub use poll::{wait_for_completion, PollPolicy};
pub use types::{FileObject, FilePurpose, MessageList, MessageRole, Run, RunStatus, Thread, ThreadMessage};
pub use upload::{StagedUpload, UploadAdapter};
