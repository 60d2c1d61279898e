mod object_transfer_store;
mod store_factory;

pub use object_transfer_store::{
    InMemoryTransferStore, ObjectTransferStore, OssTransferStore, UrlSigner,
    virtual_hosted_endpoint,
};
pub use store_factory::{InMemoryStoreConnector, OssStoreConnector, StoreConnectorFactory};
