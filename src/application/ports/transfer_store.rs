use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::ObjectKey;

/// Handle on a multipart transfer opened against one object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartHandle {
    pub object_key: ObjectKey,
    pub upload_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPart {
    pub part_number: u32,
    pub e_tag: String,
}

/// Remote object store as seen by the transfer pipeline.
#[async_trait]
pub trait TransferStore: Send + Sync {
    async fn initiate_multipart(
        &self,
        object_key: &ObjectKey,
    ) -> Result<MultipartHandle, TransferStoreError>;

    async fn upload_part(
        &self,
        handle: &MultipartHandle,
        part_number: u32,
        data: Bytes,
    ) -> Result<UploadedPart, TransferStoreError>;

    async fn complete_multipart(
        &self,
        handle: &MultipartHandle,
        parts: &[UploadedPart],
    ) -> Result<Option<String>, TransferStoreError>;

    async fn abort_multipart(&self, handle: &MultipartHandle) -> Result<(), TransferStoreError>;

    async fn put_object(&self, object_key: &ObjectKey, data: Bytes)
    -> Result<(), TransferStoreError>;

    async fn object_exists(&self, object_key: &ObjectKey) -> Result<bool, TransferStoreError>;

    async fn signed_url(
        &self,
        object_key: &ObjectKey,
        ttl: Duration,
    ) -> Result<String, TransferStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransferStoreError {
    #[error("object store request failed: {0}")]
    Backend(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("invalid session state: {0}")]
    InvalidState(String),
    #[error("store configuration invalid: {0}")]
    Configuration(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
