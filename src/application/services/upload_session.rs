use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::application::ports::{
    MultipartHandle, ProgressEvent, ProgressSink, SilentProgress, TransferStore,
    TransferStoreError, UploadedPart,
};
use crate::domain::{ChunkRanges, ObjectKey};

use super::PartSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Uninitialized,
    CredentialsObtained,
    SessionOpen,
    PartsUploading,
    Completed,
    Aborted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "UNINITIALIZED",
            SessionState::CredentialsObtained => "CREDENTIALS_OBTAINED",
            SessionState::SessionOpen => "SESSION_OPEN",
            SessionState::PartsUploading => "PARTS_UPLOADING",
            SessionState::Completed => "COMPLETED",
            SessionState::Aborted => "ABORTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Aborted)
    }

    /// Legal edges of the lifecycle. Abort is reachable from every open state.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, next),
            (Uninitialized, CredentialsObtained)
                | (CredentialsObtained, SessionOpen)
                | (SessionOpen, PartsUploading)
                | (PartsUploading, PartsUploading)
                | (PartsUploading, Completed)
                | (SessionOpen | PartsUploading, Aborted)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Step of a remote transfer that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferStage {
    Init,
    Part(u32),
    Complete,
    Abort,
    Put,
    Verify,
    Sign,
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStage::Init => write!(f, "init"),
            TransferStage::Part(n) => write!(f, "part {}", n),
            TransferStage::Complete => write!(f, "complete"),
            TransferStage::Abort => write!(f, "abort"),
            TransferStage::Put => write!(f, "put"),
            TransferStage::Verify => write!(f, "verify"),
            TransferStage::Sign => write!(f, "sign"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("transfer {stage} failed: {source}")]
pub struct TransferError {
    pub stage: TransferStage,
    #[source]
    pub source: TransferStoreError,
}

impl TransferError {
    pub fn new(stage: TransferStage, source: TransferStoreError) -> Self {
        Self { stage, source }
    }

    pub fn at(stage: TransferStage) -> impl FnOnce(TransferStoreError) -> Self {
        move |source| Self { stage, source }
    }
}

/// One multipart transfer: initiate, sequential parts, complete or abort.
///
/// Any failure after the session is open aborts the remote upload once and
/// leaves the session in [`SessionState::Aborted`].
pub struct UploadSession {
    store: Arc<dyn TransferStore>,
    handle: MultipartHandle,
    parts: Vec<UploadedPart>,
    state: SessionState,
    progress: Arc<dyn ProgressSink>,
}

impl UploadSession {
    /// Opens a session for a store already bound to fresh credentials, moving
    /// from [`SessionState::CredentialsObtained`] to [`SessionState::SessionOpen`].
    pub async fn open(
        store: Arc<dyn TransferStore>,
        object_key: &ObjectKey,
    ) -> Result<Self, TransferError> {
        let handle = store
            .initiate_multipart(object_key)
            .await
            .map_err(TransferError::at(TransferStage::Init))?;

        tracing::debug!(
            object_key = %object_key,
            upload_id = %handle.upload_id,
            "Multipart session opened"
        );

        let mut session = Self {
            store,
            handle,
            parts: Vec::new(),
            state: SessionState::CredentialsObtained,
            progress: Arc::new(SilentProgress),
        };
        session.set_state(SessionState::SessionOpen);
        Ok(session)
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    fn set_state(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        if self.state != next {
            tracing::debug!(
                object_key = %self.handle.object_key,
                from = %self.state,
                to = %next,
                "Session state changed"
            );
        }
        self.state = next;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn object_key(&self) -> &ObjectKey {
        &self.handle.object_key
    }

    pub fn parts(&self) -> &[UploadedPart] {
        &self.parts
    }

    pub async fn upload_part(&mut self, part_number: u32, data: Bytes) -> Result<(), TransferError> {
        let stage = TransferStage::Part(part_number);

        if self.state.is_terminal() {
            return Err(TransferError::new(
                stage,
                TransferStoreError::InvalidState(format!("session is {}", self.state)),
            ));
        }

        let expected = self.parts.len() as u32 + 1;
        if part_number != expected {
            let err = TransferError::new(
                stage,
                TransferStoreError::InvalidState(format!(
                    "expected part {}, got {}",
                    expected, part_number
                )),
            );
            self.abort().await;
            return Err(err);
        }

        self.set_state(SessionState::PartsUploading);
        let size = data.len();

        match self.store.upload_part(&self.handle, part_number, data).await {
            Ok(part) => {
                tracing::debug!(
                    object_key = %self.handle.object_key,
                    part_number,
                    bytes = size,
                    "Part uploaded"
                );
                self.parts.push(part);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    object_key = %self.handle.object_key,
                    part_number,
                    error = %e,
                    "Part upload failed"
                );
                self.abort().await;
                Err(TransferError::new(stage, e))
            }
        }
    }

    /// Finalizes with the parts recorded so far, which are contiguous `1..N`.
    pub async fn complete(&mut self) -> Result<Option<String>, TransferError> {
        if self.state.is_terminal() || self.parts.is_empty() {
            let reason = if self.parts.is_empty() {
                "no parts uploaded".to_string()
            } else {
                format!("session is {}", self.state)
            };
            if !self.state.is_terminal() {
                self.abort().await;
            }
            return Err(TransferError::new(
                TransferStage::Complete,
                TransferStoreError::InvalidState(reason),
            ));
        }

        match self
            .store
            .complete_multipart(&self.handle, &self.parts)
            .await
        {
            Ok(e_tag) => {
                self.set_state(SessionState::Completed);
                tracing::info!(
                    object_key = %self.handle.object_key,
                    parts = self.parts.len(),
                    e_tag = e_tag.as_deref().unwrap_or(""),
                    "Multipart upload completed"
                );
                Ok(e_tag)
            }
            Err(e) => {
                self.abort().await;
                Err(TransferError::new(TransferStage::Complete, e))
            }
        }
    }

    /// Best-effort abort. A failure here is logged and never replaces the
    /// error that triggered it.
    pub async fn abort(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.set_state(SessionState::Aborted);

        if let Err(e) = self.store.abort_multipart(&self.handle).await {
            tracing::warn!(
                object_key = %self.handle.object_key,
                upload_id = %self.handle.upload_id,
                error = %TransferError::new(TransferStage::Abort, e),
                "Failed to abort multipart upload"
            );
        } else {
            tracing::info!(
                object_key = %self.handle.object_key,
                parts_uploaded = self.parts.len(),
                "Multipart upload aborted"
            );
        }
    }

    /// Uploads every range of `ranges` from `source` in order, then completes.
    pub async fn upload_all<S>(
        &mut self,
        ranges: ChunkRanges,
        source: &mut S,
        pacing: Duration,
    ) -> Result<Option<String>, TransferError>
    where
        S: PartSource + ?Sized,
    {
        let total = ranges.part_count();
        self.progress.report(ProgressEvent::Start {
            label: self.handle.object_key.to_string(),
            total_parts: total,
        });

        for range in ranges {
            let part_number = match u32::try_from(range.part_number()) {
                Ok(n) => n,
                Err(_) => {
                    self.abort().await;
                    return Err(TransferError::new(
                        TransferStage::Part(u32::MAX),
                        TransferStoreError::InvalidState("part number overflow".to_string()),
                    ));
                }
            };

            let data = match source.read_range(&range).await {
                Ok(d) => d,
                Err(e) => {
                    self.abort().await;
                    return Err(TransferError::new(
                        TransferStage::Part(part_number),
                        TransferStoreError::Io(e),
                    ));
                }
            };

            self.upload_part(part_number, data).await?;
            self.progress.report(ProgressEvent::Advance {
                part_number: range.part_number(),
                bytes: range.length,
            });

            tracing::info!(
                object_key = %self.handle.object_key,
                part = part_number,
                total,
                "Upload progress"
            );

            if !pacing.is_zero() && range.part_number() < total {
                tokio::time::sleep(pacing).await;
            }
        }

        let e_tag = self.complete().await?;
        self.progress.report(ProgressEvent::Finish);
        Ok(e_tag)
    }
}
