//! Token-endpoint ICE credential client.
//!
//! Posts to the configured token endpoint with HTTP basic auth and maps the
//! response into wire descriptors. Credentials come from the environment so
//! they never land in config files.

use async_trait::async_trait;
use serde::Deserialize;

use pairlink_core::{error::PairlinkError, protocol::IceServer, Result};

use crate::config::IceConfig;
use crate::ice::IceProvider;

/// Environment variable holding the account identifier.
pub const ACCOUNT_SID_ENV: &str = "PAIRLINK_ICE_ACCOUNT_SID";
/// Environment variable holding the auth token.
pub const AUTH_TOKEN_ENV: &str = "PAIRLINK_ICE_AUTH_TOKEN";

pub struct TokenIceClient {
    token_url: String,
    account_sid: String,
    auth_token: String,
    client: reqwest::Client,
}

impl TokenIceClient {
    /// Build from config plus environment credentials.
    pub fn from_config(cfg: &IceConfig) -> Result<Self> {
        let account_sid = std::env::var(ACCOUNT_SID_ENV)
            .map_err(|_| PairlinkError::BadRequest(format!("{ACCOUNT_SID_ENV} is not set")))?;
        let auth_token = std::env::var(AUTH_TOKEN_ENV)
            .map_err(|_| PairlinkError::BadRequest(format!("{AUTH_TOKEN_ENV} is not set")))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| PairlinkError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            token_url: cfg.token_url.clone(),
            account_sid,
            auth_token,
            client,
        })
    }
}

#[async_trait]
impl IceProvider for TokenIceClient {
    async fn fetch_ice_servers(&self) -> Result<Vec<IceServer>> {
        let resp = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await
            .map_err(|e| PairlinkError::Unavailable(format!("token endpoint unreachable: {e}")))?
            .error_for_status()
            .map_err(|e| PairlinkError::Unavailable(format!("token endpoint rejected: {e}")))?;

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| PairlinkError::Unavailable(format!("token response decode failed: {e}")))?;

        Ok(token
            .ice_servers
            .into_iter()
            .filter_map(TokenIceEntry::into_ice_server)
            .collect())
    }
}

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    ice_servers: Vec<TokenIceEntry>,
}

/// One descriptor as issued by the endpoint. Entries may carry a single URI
/// (`url`, legacy) or one-or-many under `urls`.
#[derive(Debug, Deserialize)]
struct TokenIceEntry {
    #[serde(default)]
    urls: Option<UrlsField>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    credential: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UrlsField {
    One(String),
    Many(Vec<String>),
}

impl TokenIceEntry {
    fn into_ice_server(self) -> Option<IceServer> {
        let urls = match (self.urls, self.url) {
            (Some(UrlsField::One(u)), _) => vec![u],
            (Some(UrlsField::Many(us)), _) => us,
            (None, Some(u)) => vec![u],
            (None, None) => return None,
        };
        Some(IceServer {
            urls,
            username: self.username,
            credential: self.credential,
        })
    }
}
