use std::sync::Arc;

use crate::domain::TemporaryCredentials;

use super::{TransferStore, TransferStoreError};

/// Binds a [`TransferStore`] to one set of temporary credentials.
pub trait StoreConnector: Send + Sync {
    fn connect(
        &self,
        credentials: &TemporaryCredentials,
    ) -> Result<Arc<dyn TransferStore>, TransferStoreError>;
}
