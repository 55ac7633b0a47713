use serde::Serialize;
use std::fmt;

use super::auth::AccessToken;
use super::media::MediaVariant;
use super::transport::{HttpRequest, HttpTransport};
use super::uploader::UploadedMediaInfo;
use crate::errors::{AppError, AppResult};
use crate::security::InputValidator;

/// `msg_type` for rich-media messages.
pub const MSG_TYPE_RICH_MEDIA: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    User,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTarget {
    pub id: String,
    pub kind: TargetKind,
}

impl MessageTarget {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TargetKind::User,
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TargetKind::Group,
        }
    }

    pub fn messages_path(&self) -> String {
        match self.kind {
            TargetKind::User => format!("/v2/users/{}/messages", self.id),
            TargetKind::Group => format!("/v2/groups/{}/messages", self.id),
        }
    }
}

impl fmt::Display for MessageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TargetKind::User => write!(f, "User {}", self.id),
            TargetKind::Group => write!(f, "Group {}", self.id),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MediaElement {
    File {
        file_info: String,
    },
    Image {
        #[serde(rename = "type")]
        kind: String,
        content: String,
    },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RichMediaMessage {
    pub msg_type: u8,
    pub media: Vec<MediaElement>,
}

impl RichMediaMessage {
    /// Wrap the uploaded reference. Consumes it so it cannot be sent twice.
    pub fn new(media: UploadedMediaInfo, variant: MediaVariant) -> Self {
        let element = match variant {
            MediaVariant::File => MediaElement::File {
                file_info: media.into_inner(),
            },
            MediaVariant::Image => MediaElement::Image {
                kind: "image".to_string(),
                content: media.into_inner(),
            },
        };

        Self {
            msg_type: MSG_TYPE_RICH_MEDIA,
            media: vec![element],
        }
    }
}

pub struct MessageDispatcher<'a> {
    transport: &'a dyn HttpTransport,
    api_base: String,
    app_id: String,
}

impl<'a> MessageDispatcher<'a> {
    pub fn new(
        transport: &'a dyn HttpTransport,
        api_base: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_base: api_base.into(),
            app_id: app_id.into(),
        }
    }

    pub fn messages_url(&self, target: &MessageTarget) -> String {
        format!("{}{}", self.api_base, target.messages_path())
    }

    /// Send a rich-media message referencing `media` to `target`.
    ///
    /// Succeeds only when the platform answers with `code` 0; anything else
    /// is a `Dispatch` error carrying the raw body.
    pub async fn send(
        &self,
        token: &AccessToken,
        target: &MessageTarget,
        media: UploadedMediaInfo,
        variant: MediaVariant,
    ) -> AppResult<()> {
        InputValidator::validate_target_id(&target.id)?;

        let message = RichMediaMessage::new(media, variant);
        let request = HttpRequest::json(self.messages_url(target), &message)?
            .bot_auth(token, &self.app_id);

        let response = self
            .transport
            .post(request)
            .await
            .map_err(|e| AppError::dispatch(format!("send request failed: {}", e)))?;

        let json = response
            .json()
            .map_err(|_| AppError::dispatch(response.body.clone()))?;

        if json.get("code").and_then(|c| c.as_i64()) == Some(0) {
            log::info!("✅ Message sent to {}", target);
            Ok(())
        } else {
            log::error!("❌ Send failed: {}", response.body);
            Err(AppError::dispatch(response.body.clone()))
        }
    }
}
