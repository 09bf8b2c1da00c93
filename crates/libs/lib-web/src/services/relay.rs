//! # Relay Service
//!
//! The two operations the outside world can ask for:
//!
//! - [`RelayService::submit_message`]: one question, one assistant answer
//! - [`RelayService::submit_file`]: pass a staged file through to the hosted API
//!
//! The service keeps no state between calls. Errors come back with their kind
//! intact; the HTTP handlers and the realtime bridge decide what the client sees.

use lib_assistant::{AssistantAdapter, AssistantApi, PollPolicy, StagedUpload, UploadAdapter};
use lib_core::error::{INVALID_CHAT_MESSAGE, NO_FILE_MESSAGE};
use lib_core::{AppError, Config, Result};
use shared::utils::preview;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Service for relaying chat messages and files to the assistant.
pub struct RelayService {
    assistant: AssistantAdapter,
    uploads: UploadAdapter,
    upload_dir: PathBuf,
}

impl RelayService {
    /// Create a new relay service.
    ///
    /// # Arguments
    ///
    /// * `api` - Hosted API client shared by both adapters
    /// * `assistant_id` - Assistant every run is started against
    /// * `poll` - How run completion is awaited
    /// * `upload_dir` - Directory uploads are staged in
    pub fn new(
        api: Arc<dyn AssistantApi>,
        assistant_id: impl Into<String>,
        poll: PollPolicy,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            assistant: AssistantAdapter::new(Arc::clone(&api), assistant_id, poll),
            uploads: UploadAdapter::new(api),
            upload_dir: upload_dir.into(),
        }
    }

    pub fn from_config(api: Arc<dyn AssistantApi>, config: &Config) -> Self {
        Self::new(
            api,
            config.assistant_id.clone(),
            PollPolicy::from_config(config),
            config.upload_dir.clone(),
        )
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Relay `text` to the assistant and return its answer.
    ///
    /// A blank message is rejected with [`AppError::Validation`] before any
    /// remote call is made. The returned answer is never empty.
    #[instrument(skip_all, fields(message = %preview(text, 40)))]
    pub async fn submit_message(&self, text: &str, cancel: &CancellationToken) -> Result<String> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(INVALID_CHAT_MESSAGE.to_string()));
        }

        info!("[CHAT] Relaying message ({} chars)", text.chars().count());
        match self.assistant.converse(text, cancel).await {
            Ok(answer) => {
                debug!("[CHAT] Answer: {}", preview(&answer, 80));
                Ok(answer)
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "[CHAT] Relay failed");
                Err(e)
            }
        }
    }

    /// Create an empty staging file for an incoming upload.
    pub fn stage_upload(&self, filename: Option<&str>) -> Result<StagedUpload> {
        StagedUpload::create_in(&self.upload_dir, filename)
    }

    /// Forward a staged file and return the remote file id.
    ///
    /// `None` means the request carried no file and yields
    /// [`AppError::Validation`] with the fixed "No file uploaded." message.
    pub async fn submit_file(&self, upload: Option<StagedUpload>) -> Result<String> {
        let upload = upload.ok_or_else(|| AppError::Validation(NO_FILE_MESSAGE.to_string()))?;
        info!(
            "[UPLOAD] Forwarding \"{}\" ({} bytes)",
            upload.filename(),
            upload.len()
        );
        self.uploads.store_file(upload).await
    }
}
