mod http_credential_broker;

pub use http_credential_broker::HttpCredentialBroker;
