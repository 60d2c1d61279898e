use std::sync::Arc;

use crate::application::ports::{StoreConnector, TransferStore, TransferStoreError};
use crate::domain::TemporaryCredentials;
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::object_transfer_store::{InMemoryTransferStore, OssTransferStore};

/// Builds a fresh OSS client for every set of credentials.
pub struct OssStoreConnector {
    endpoint: String,
    bucket: String,
    region: String,
}

impl OssStoreConnector {
    pub fn new(endpoint: String, bucket: String, region: String) -> Self {
        Self {
            endpoint,
            bucket,
            region,
        }
    }
}

impl StoreConnector for OssStoreConnector {
    fn connect(
        &self,
        credentials: &TemporaryCredentials,
    ) -> Result<Arc<dyn TransferStore>, TransferStoreError> {
        let store = OssTransferStore::oss(&self.endpoint, &self.bucket, &self.region, credentials)?;
        Ok(Arc::new(store))
    }
}

/// Hands out the same in-memory store regardless of credentials.
#[derive(Clone)]
pub struct InMemoryStoreConnector {
    store: Arc<InMemoryTransferStore>,
}

impl InMemoryStoreConnector {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryTransferStore::in_memory()),
        }
    }

    pub fn store(&self) -> Arc<InMemoryTransferStore> {
        Arc::clone(&self.store)
    }
}

impl Default for InMemoryStoreConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreConnector for InMemoryStoreConnector {
    fn connect(
        &self,
        _credentials: &TemporaryCredentials,
    ) -> Result<Arc<dyn TransferStore>, TransferStoreError> {
        Ok(self.store.clone())
    }
}

pub struct StoreConnectorFactory;

impl StoreConnectorFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn StoreConnector>, TransferStoreError> {
        match settings.provider {
            StorageProviderSetting::Memory => Ok(Arc::new(InMemoryStoreConnector::new())),
            StorageProviderSetting::Oss => {
                let endpoint = settings.endpoint.clone().ok_or_else(|| {
                    TransferStoreError::Configuration("storage.endpoint required".into())
                })?;
                let bucket = settings.bucket.clone().ok_or_else(|| {
                    TransferStoreError::Configuration("storage.bucket required".into())
                })?;
                let region = settings.region.clone().ok_or_else(|| {
                    TransferStoreError::Configuration("storage.region required".into())
                })?;
                Ok(Arc::new(OssStoreConnector::new(endpoint, bucket, region)))
            }
        }
    }
}
