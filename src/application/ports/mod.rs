mod credential_broker;
mod progress_sink;
mod store_connector;
mod transfer_store;

pub use credential_broker::{CredentialBroker, CredentialError};
pub use progress_sink::{ProgressEvent, ProgressSink, SilentProgress};
pub use store_connector::StoreConnector;
pub use transfer_store::{MultipartHandle, TransferStore, TransferStoreError, UploadedPart};
