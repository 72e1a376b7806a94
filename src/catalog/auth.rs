use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::Deserialize;

use super::CatalogError;
use crate::config::Credentials;

/// Tokens are refreshed this long before the server says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Client-credentials token exchange with a cached bearer token.
#[derive(Debug)]
pub struct ClientCredentialsAuth {
    auth_url: String,
    credentials: Credentials,
    token: Option<AccessToken>,
}

impl ClientCredentialsAuth {
    pub fn new(auth_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            auth_url: auth_url.into(),
            credentials,
            token: None,
        }
    }

    /// Return a valid bearer token, requesting a new one when needed.
    pub fn bearer(&mut self, http: &Client) -> Result<&str, CatalogError> {
        let fresh = self
            .token
            .as_ref()
            .is_some_and(|t| Instant::now() < t.expires_at);

        if !fresh {
            self.token = Some(self.request_token(http)?);
        }

        self.token
            .as_ref()
            .map(|t| t.value.as_str())
            .ok_or_else(|| CatalogError::Auth("no access token".to_string()))
    }

    /// Drop the cached token so the next call fetches a new one.
    pub fn invalidate(&mut self) {
        self.token = None;
    }

    fn request_token(&self, http: &Client) -> Result<AccessToken, CatalogError> {
        tracing::debug!(url = %self.auth_url, "requesting access token");

        let response = http
            .post(&self.auth_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(CatalogError::Auth(format!("{}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}
