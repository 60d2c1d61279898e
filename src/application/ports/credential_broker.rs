use async_trait::async_trait;

use crate::domain::TemporaryCredentials;

#[async_trait]
pub trait CredentialBroker: Send + Sync {
    async fn fetch_credentials(&self) -> Result<TemporaryCredentials, CredentialError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential request failed: {0}")]
    Request(String),
    #[error("credential broker denied the request (code {code}): {message}")]
    Denied { code: i64, message: String },
    #[error("malformed credential response: {0}")]
    MalformedResponse(String),
    #[error("invalid credentials: {0}")]
    Invalid(String),
}
