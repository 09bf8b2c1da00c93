//! # Upload Adapter
//!
//! Stages incoming file bytes in a uniquely named temporary file and forwards
//! them to the hosted API. The temporary file belongs to a [`StagedUpload`]
//! and is removed when that value goes away, whether the remote submit
//! succeeded or not.

use crate::api::AssistantApi;
use crate::types::FilePurpose;
use lib_core::error::NO_FILE_MESSAGE;
use lib_core::{AppError, Result};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

/// A client file written to local temporary storage.
pub struct StagedUpload {
    file: NamedTempFile,
    writer: tokio::fs::File,
    filename: String,
    len: u64,
}

impl StagedUpload {
    /// Create an empty staging file inside `dir`.
    ///
    /// `filename` is the name the client gave the file; a generated name is
    /// used when it is missing or blank.
    pub fn create_in(dir: &Path, filename: Option<&str>) -> Result<Self> {
        let file = tempfile::Builder::new().prefix("upload-").tempfile_in(dir)?;
        let writer = tokio::fs::File::from_std(file.reopen()?);

        let filename = filename
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                file.path()
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".to_string())
            });

        debug!(path = ?file.path(), filename = %filename, "[UPLOAD] Staging file created");
        Ok(Self {
            file,
            writer,
            filename,
            len: 0,
        })
    }

    /// Append a chunk of file contents.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.writer.write_all(chunk).await?;
        self.len += chunk.len() as u64;
        Ok(())
    }

    /// Flush buffered bytes to disk.
    pub async fn finish(&mut self) -> Result<()> {
        self.writer.flush().await?;
        self.writer.sync_all().await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove the staging file now, reporting failures instead of ignoring them.
    fn discard(self) {
        let path = self.file.path().to_path_buf();
        drop(self.writer);
        match self.file.close() {
            Ok(()) => debug!(path = ?path, "[UPLOAD] Staging file removed"),
            Err(e) => warn!(path = ?path, error = %e, "[UPLOAD] Failed to remove staging file"),
        }
    }
}

/// Forwards staged files to the hosted API.
#[derive(Clone)]
pub struct UploadAdapter {
    api: Arc<dyn AssistantApi>,
}

impl UploadAdapter {
    pub fn new(api: Arc<dyn AssistantApi>) -> Self {
        Self { api }
    }

    /// Submit `upload` for assistant use and return the remote file id.
    ///
    /// The staging file is removed before this returns, on every path.
    /// An empty or vanished staging file is an [`AppError::Validation`].
    #[instrument(skip_all, fields(filename = %upload.filename(), bytes = upload.len()))]
    pub async fn store_file(&self, upload: StagedUpload) -> Result<String> {
        let result = self.submit(&upload).await;
        upload.discard();

        let file_id = result?;
        info!(file_id = %file_id, "[UPLOAD] File stored remotely");
        Ok(file_id)
    }

    async fn submit(&self, upload: &StagedUpload) -> Result<String> {
        if upload.is_empty() || tokio::fs::metadata(upload.path()).await.is_err() {
            return Err(AppError::Validation(NO_FILE_MESSAGE.to_string()));
        }

        let file = self
            .api
            .upload_file(upload.path(), upload.filename(), FilePurpose::Assistants)
            .await?;
        Ok(file.id)
    }
}
