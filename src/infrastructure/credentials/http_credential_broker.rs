use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CredentialBroker, CredentialError};
use crate::domain::TemporaryCredentials;
use crate::infrastructure::observability::mask_secret;

const TOKEN_PATH: &str = "/get_oss_token";

/// Exchanges the application key pair for temporary OSS credentials.
pub struct HttpCredentialBroker {
    client: Client,
    base_url: String,
    app_key: String,
    app_secret: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    app_key: &'a str,
    app_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    code: i64,
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<TokenData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenData {
    access_key_id: String,
    access_key_secret: String,
    security_token: String,
    expiration: String,
}

impl HttpCredentialBroker {
    pub fn new(base_url: String, app_key: String, app_secret: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            app_key,
            app_secret,
        }
    }

    fn token_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), TOKEN_PATH)
    }
}

fn parse_expiration(raw: &str) -> Result<DateTime<Utc>, CredentialError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CredentialError::MalformedResponse(format!("Expiration '{}': {}", raw, e)))
}

#[async_trait]
impl CredentialBroker for HttpCredentialBroker {
    async fn fetch_credentials(&self) -> Result<TemporaryCredentials, CredentialError> {
        let url = self.token_url();
        tracing::debug!(url = %url, app_key = %mask_secret(&self.app_key), "Requesting OSS token");

        let response = self
            .client
            .post(&url)
            .json(&TokenRequest {
                app_key: &self.app_key,
                app_secret: &self.app_secret,
            })
            .send()
            .await
            .map_err(|e| CredentialError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CredentialError::Request(e.to_string()))?;

        let token: TokenResponse = match serde_json::from_str(&body) {
            Ok(token) => token,
            Err(_) if !status.is_success() => {
                return Err(CredentialError::Request(format!("HTTP {}: {}", status, body)));
            }
            Err(e) => return Err(CredentialError::MalformedResponse(e.to_string())),
        };

        if !token.success || token.code != 200 {
            tracing::warn!(code = token.code, message = %token.message, "OSS token request denied");
            return Err(CredentialError::Denied {
                code: token.code,
                message: token.message,
            });
        }

        let data = token
            .data
            .ok_or_else(|| CredentialError::MalformedResponse("missing data".to_string()))?;

        let credentials = TemporaryCredentials {
            expiration: parse_expiration(&data.expiration)?,
            access_key_id: data.access_key_id,
            access_key_secret: data.access_key_secret,
            security_token: data.security_token,
        };

        tracing::info!(
            access_key_id = %mask_secret(&credentials.access_key_id),
            expiration = %credentials.expiration,
            "OSS token issued"
        );

        Ok(credentials)
    }
}
