use serde::Serialize;
use std::fmt;

use super::transport::{HttpRequest, HttpTransport};
use crate::config::Credentials;
use crate::errors::{AppError, AppResult};
use crate::security::redact;

/// Bearer token for a single run. Never cached or persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_in: None,
        }
    }

    pub fn with_expiry(mut self, expires_in: Option<u64>) -> Self {
        self.expires_in = expires_in;
        self
    }

    pub fn secret(&self) -> &str {
        &self.token
    }

    /// Validity window in seconds as reported by the platform.
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &redact(&self.token))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    app_id: &'a str,
    client_secret: &'a str,
}

pub struct CredentialProvider<'a> {
    transport: &'a dyn HttpTransport,
    token_url: String,
}

impl<'a> CredentialProvider<'a> {
    pub fn new(transport: &'a dyn HttpTransport, token_url: impl Into<String>) -> Self {
        Self {
            transport,
            token_url: token_url.into(),
        }
    }

    /// Exchange the application id and secret for an access token.
    pub async fn acquire_token(&self, credentials: &Credentials) -> AppResult<AccessToken> {
        let payload = TokenRequest {
            app_id: &credentials.app_id,
            client_secret: &credentials.app_secret,
        };
        let request = HttpRequest::json(self.token_url.as_str(), &payload)?;

        let response = self
            .transport
            .post(request)
            .await
            .map_err(|e| AppError::authentication(format!("token request failed: {}", e)))?;

        let json = response
            .json()
            .map_err(|_| AppError::authentication(response.body.clone()))?;

        let token = json
            .get("access_token")
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication(response.body.clone()))?;

        let expires_in = json.get("expires_in").and_then(parse_expires_in);
        if let Some(seconds) = expires_in {
            log::debug!("Access token valid for {}s", seconds);
        }

        Ok(AccessToken::new(token).with_expiry(expires_in))
    }
}

// The platform has been seen to send this both as a number and as a string.
fn parse_expires_in(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
