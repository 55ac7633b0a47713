use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use super::auth::AccessToken;
use super::multipart::UploadPayload;
use crate::errors::AppResult;
use crate::security::redact;

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_APP_ID: &str = "X-Union-Appid";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Bytes(Vec<u8>),
    /// Encoded as multipart/form-data by the transport, which also sets the
    /// Content-Type header and boundary.
    Multipart(UploadPayload),
}

impl RequestBody {
    pub fn len(&self) -> usize {
        match self {
            RequestBody::Bytes(bytes) => bytes.len(),
            RequestBody::Multipart(payload) => payload.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fully buffered outgoing POST.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Bytes(Vec::new()),
        }
    }

    pub fn json<T: Serialize>(url: impl Into<String>, payload: &T) -> AppResult<Self> {
        let body = serde_json::to_vec(payload)?;
        Ok(Self::new(url)
            .header(HEADER_CONTENT_TYPE, "application/json")
            .body(body))
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = RequestBody::Bytes(body);
        self
    }

    pub fn multipart(mut self, payload: UploadPayload) -> Self {
        self.body = RequestBody::Multipart(payload);
        self
    }

    pub fn body_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            RequestBody::Bytes(bytes) => Some(bytes),
            RequestBody::Multipart(_) => None,
        }
    }

    pub fn form(&self) -> Option<&UploadPayload> {
        match &self.body {
            RequestBody::Multipart(payload) => Some(payload),
            RequestBody::Bytes(_) => None,
        }
    }

    /// Attach the bot authorization pair every platform call except token
    /// issuance requires.
    pub fn bot_auth(self, token: &AccessToken, app_id: &str) -> Self {
        self.header(HEADER_AUTHORIZATION, format!("QQBot {}", token.secret()))
            .header(HEADER_APP_ID, app_id)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, String)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case(HEADER_AUTHORIZATION) {
                    (key.as_str(), redact(value))
                } else {
                    (key.as_str(), value.clone())
                }
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(&self) -> AppResult<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// The HTTP seam the workflow talks through.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        log::debug!("POST {} ({} bytes)", request.url, request.body.len());

        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Bytes(bytes) => builder.body(bytes),
            RequestBody::Multipart(payload) => builder.multipart(payload.build_form()?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        // Never log response bodies: the token endpoint returns the token in one.
        log::debug!("Response {} ({} bytes)", status, body.len());

        Ok(HttpResponse { status, body })
    }
}
