use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;

use wavelift::application::ports::{
    MultipartHandle, TransferStore, TransferStoreError, UploadedPart,
};
use wavelift::domain::ObjectKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Initiate(String),
    Part(u32, usize),
    Complete(usize),
    Abort,
    Put(String, usize),
    Exists(String),
    Sign(String),
}

/// Records every call; can be told to fail one part, one split put, or to
/// report objects missing.
pub struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    fail_part: Option<u32>,
    fail_put: Option<u32>,
    objects_exist: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_part: None,
            fail_put: None,
            objects_exist: true,
        }
    }

    pub fn failing_part(part_number: u32) -> Self {
        Self {
            fail_part: Some(part_number),
            ..Self::new()
        }
    }

    /// Fails the put whose key ends in `part_{part_number}.wav`.
    pub fn failing_put(part_number: u32) -> Self {
        Self {
            fail_put: Some(part_number),
            ..Self::new()
        }
    }

    pub fn with_missing_objects() -> Self {
        Self {
            objects_exist: false,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl TransferStore for RecordingStore {
    async fn initiate_multipart(
        &self,
        object_key: &ObjectKey,
    ) -> Result<MultipartHandle, TransferStoreError> {
        self.record(StoreCall::Initiate(object_key.to_string()));
        Ok(MultipartHandle {
            object_key: object_key.clone(),
            upload_id: "upload-1".to_string(),
        })
    }

    async fn upload_part(
        &self,
        _handle: &MultipartHandle,
        part_number: u32,
        data: Bytes,
    ) -> Result<UploadedPart, TransferStoreError> {
        self.record(StoreCall::Part(part_number, data.len()));
        if self.fail_part == Some(part_number) {
            return Err(TransferStoreError::Backend("connection reset".to_string()));
        }
        Ok(UploadedPart {
            part_number,
            e_tag: format!("etag-{}", part_number),
        })
    }

    async fn complete_multipart(
        &self,
        _handle: &MultipartHandle,
        parts: &[UploadedPart],
    ) -> Result<Option<String>, TransferStoreError> {
        self.record(StoreCall::Complete(parts.len()));
        Ok(Some("final-etag".to_string()))
    }

    async fn abort_multipart(&self, _handle: &MultipartHandle) -> Result<(), TransferStoreError> {
        self.record(StoreCall::Abort);
        Ok(())
    }

    async fn put_object(
        &self,
        object_key: &ObjectKey,
        data: Bytes,
    ) -> Result<(), TransferStoreError> {
        self.record(StoreCall::Put(object_key.to_string(), data.len()));
        if let Some(n) = self.fail_put {
            if object_key.as_str().ends_with(&format!("part_{}.wav", n)) {
                return Err(TransferStoreError::Backend("put rejected".to_string()));
            }
        }
        Ok(())
    }

    async fn object_exists(&self, object_key: &ObjectKey) -> Result<bool, TransferStoreError> {
        self.record(StoreCall::Exists(object_key.to_string()));
        Ok(self.objects_exist)
    }

    async fn signed_url(
        &self,
        object_key: &ObjectKey,
        ttl: Duration,
    ) -> Result<String, TransferStoreError> {
        self.record(StoreCall::Sign(object_key.to_string()));
        Ok(format!("https://signed.test/{}?ttl={}", object_key, ttl.as_secs()))
    }
}
