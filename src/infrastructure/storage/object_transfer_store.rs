use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::memory::InMemory;
use object_store::multipart::{MultipartStore, PartId};
use object_store::path::Path as StorePath;
use object_store::signer::Signer;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{
    MultipartHandle, TransferStore, TransferStoreError, UploadedPart,
};
use crate::domain::{ObjectKey, TemporaryCredentials};

/// Issues GET URLs for objects of a backend.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    async fn sign_get(&self, path: &StorePath, ttl: Duration) -> Result<String, TransferStoreError>;
}

#[async_trait]
impl UrlSigner for AmazonS3 {
    async fn sign_get(&self, path: &StorePath, ttl: Duration) -> Result<String, TransferStoreError> {
        let url = self
            .signed_url(http::Method::GET, path, ttl)
            .await
            .map_err(|e| TransferStoreError::Backend(e.to_string()))?;
        Ok(url.to_string())
    }
}

#[async_trait]
impl UrlSigner for InMemory {
    async fn sign_get(&self, path: &StorePath, ttl: Duration) -> Result<String, TransferStoreError> {
        Ok(format!("memory:///{}?expires_in={}", path, ttl.as_secs()))
    }
}

/// [`TransferStore`] over any `object_store` backend that supports
/// explicit multipart sessions.
pub struct ObjectTransferStore<S> {
    inner: Arc<S>,
}

pub type OssTransferStore = ObjectTransferStore<AmazonS3>;
pub type InMemoryTransferStore = ObjectTransferStore<InMemory>;

impl<S> ObjectTransferStore<S> {
    pub fn from_store(inner: Arc<S>) -> Self {
        Self { inner }
    }
}

impl<S: ObjectStore> ObjectTransferStore<S> {
    pub async fn fetch(&self, object_key: &ObjectKey) -> Result<Bytes, TransferStoreError> {
        let store_path = StorePath::from(object_key.as_str());
        let result = self
            .inner
            .get(&store_path)
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => {
                    TransferStoreError::NotFound(object_key.to_string())
                }
                other => TransferStoreError::Backend(other.to_string()),
            })?;

        result
            .bytes()
            .await
            .map_err(|e| TransferStoreError::Backend(e.to_string()))
    }
}

impl ObjectTransferStore<InMemory> {
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemory::new()))
    }
}

impl ObjectTransferStore<AmazonS3> {
    /// S3-compatible store (Alibaba OSS and friends) authenticated with
    /// temporary credentials.
    pub fn oss(
        endpoint: &str,
        bucket: &str,
        region: &str,
        credentials: &TemporaryCredentials,
    ) -> Result<Self, TransferStoreError> {
        let store = AmazonS3Builder::new()
            .with_endpoint(virtual_hosted_endpoint(endpoint, bucket)?)
            .with_virtual_hosted_style_request(true)
            .with_bucket_name(bucket)
            .with_region(region)
            .with_access_key_id(&credentials.access_key_id)
            .with_secret_access_key(&credentials.access_key_secret)
            .with_token(&credentials.security_token)
            .build()
            .map_err(|e| TransferStoreError::Configuration(e.to_string()))?;

        Ok(Self::from_store(Arc::new(store)))
    }
}

/// `https://endpoint` + `bucket` → `https://bucket.endpoint`.
pub fn virtual_hosted_endpoint(endpoint: &str, bucket: &str) -> Result<String, TransferStoreError> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    let (scheme, host) = endpoint.split_once("://").ok_or_else(|| {
        TransferStoreError::Configuration(format!("endpoint has no scheme: {}", endpoint))
    })?;

    if bucket.is_empty() || host.is_empty() {
        return Err(TransferStoreError::Configuration(
            "endpoint host and bucket are required".to_string(),
        ));
    }

    if host.starts_with(&format!("{}.", bucket)) {
        return Ok(endpoint.to_string());
    }

    Ok(format!("{}://{}.{}", scheme, bucket, host))
}

fn part_index(part_number: u32) -> Result<usize, TransferStoreError> {
    part_number
        .checked_sub(1)
        .map(|i| i as usize)
        .ok_or_else(|| TransferStoreError::InvalidState("part numbers start at 1".to_string()))
}

#[async_trait]
impl<S> TransferStore for ObjectTransferStore<S>
where
    S: ObjectStore + MultipartStore + UrlSigner,
{
    async fn initiate_multipart(
        &self,
        object_key: &ObjectKey,
    ) -> Result<MultipartHandle, TransferStoreError> {
        let store_path = StorePath::from(object_key.as_str());
        let upload_id = self
            .inner
            .create_multipart(&store_path)
            .await
            .map_err(|e| TransferStoreError::Backend(e.to_string()))?;

        Ok(MultipartHandle {
            object_key: object_key.clone(),
            upload_id,
        })
    }

    async fn upload_part(
        &self,
        handle: &MultipartHandle,
        part_number: u32,
        data: Bytes,
    ) -> Result<UploadedPart, TransferStoreError> {
        let store_path = StorePath::from(handle.object_key.as_str());
        let part = self
            .inner
            .put_part(
                &store_path,
                &handle.upload_id,
                part_index(part_number)?,
                PutPayload::from(data),
            )
            .await
            .map_err(|e| TransferStoreError::Backend(e.to_string()))?;

        Ok(UploadedPart {
            part_number,
            e_tag: part.content_id,
        })
    }

    async fn complete_multipart(
        &self,
        handle: &MultipartHandle,
        parts: &[UploadedPart],
    ) -> Result<Option<String>, TransferStoreError> {
        let store_path = StorePath::from(handle.object_key.as_str());
        let part_ids = parts
            .iter()
            .map(|p| PartId {
                content_id: p.e_tag.clone(),
            })
            .collect();

        let result = self
            .inner
            .complete_multipart(&store_path, &handle.upload_id, part_ids)
            .await
            .map_err(|e| TransferStoreError::Backend(e.to_string()))?;

        Ok(result.e_tag)
    }

    async fn abort_multipart(&self, handle: &MultipartHandle) -> Result<(), TransferStoreError> {
        let store_path = StorePath::from(handle.object_key.as_str());
        self.inner
            .abort_multipart(&store_path, &handle.upload_id)
            .await
            .map_err(|e| TransferStoreError::Backend(e.to_string()))
    }

    async fn put_object(
        &self,
        object_key: &ObjectKey,
        data: Bytes,
    ) -> Result<(), TransferStoreError> {
        let store_path = StorePath::from(object_key.as_str());
        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| TransferStoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn object_exists(&self, object_key: &ObjectKey) -> Result<bool, TransferStoreError> {
        let store_path = StorePath::from(object_key.as_str());
        match self.inner.head(&store_path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(TransferStoreError::Backend(e.to_string())),
        }
    }

    async fn signed_url(
        &self,
        object_key: &ObjectKey,
        ttl: Duration,
    ) -> Result<String, TransferStoreError> {
        let store_path = StorePath::from(object_key.as_str());
        self.inner.sign_get(&store_path, ttl).await
    }
}
