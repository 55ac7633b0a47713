use std::fmt;

use super::auth::AccessToken;
use super::media::{MediaFile, MediaVariant};
use super::multipart::UploadPayload;
use super::transport::{HttpRequest, HttpTransport};
use crate::errors::{AppError, AppResult};

/// Opaque platform reference to uploaded bytes. Not `Clone`: it is handed by
/// value to the one send that follows the upload.
#[derive(PartialEq, Eq)]
pub struct UploadedMediaInfo(String);

impl UploadedMediaInfo {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for UploadedMediaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UploadedMediaInfo").field(&self.0).finish()
    }
}

pub struct MediaUploader<'a> {
    transport: &'a dyn HttpTransport,
    api_base: String,
    app_id: String,
}

impl<'a> MediaUploader<'a> {
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

    pub fn files_url(&self) -> String {
        format!("{}/v2/files", self.api_base)
    }

    /// Build the form fields for `file`: `file_type`, `file_type_data`, `file`.
    pub fn build_payload(file: &MediaFile, variant: MediaVariant) -> UploadPayload {
        let class = file.class();
        let mut payload = UploadPayload::new();
        payload.add_text_field("file_type", class.code().to_string());
        payload.add_text_field("file_type_data", file.extension());

        match variant {
            MediaVariant::File => payload.add_file(
                "file",
                file.file_name(),
                "application/octet-stream",
                file.bytes().to_vec(),
            ),
            MediaVariant::Image => payload.add_file(
                "file",
                format!("image.{}", file.extension()),
                "image/jpeg",
                file.bytes().to_vec(),
            ),
        }

        payload
    }

    /// Upload `file` and return the platform's reference to it.
    pub async fn upload(
        &self,
        token: &AccessToken,
        file: &MediaFile,
        variant: MediaVariant,
    ) -> AppResult<UploadedMediaInfo> {
        let payload = Self::build_payload(file, variant);
        log::debug!(
            "Uploading {} ({} bytes, {}, file_type={})",
            file.path(),
            file.len(),
            file.class(),
            file.class().code()
        );

        let request = HttpRequest::new(self.files_url())
            .bot_auth(token, &self.app_id)
            .multipart(payload);

        let response = self
            .transport
            .post(request)
            .await
            .map_err(|e| AppError::upload(format!("upload request failed: {}", e)))?;

        let json = response
            .json()
            .map_err(|_| AppError::upload(response.body.clone()))?;

        match json.get("file_info").and_then(|v| v.as_str()) {
            Some(file_info) if !file_info.is_empty() => {
                log::info!("✅ File uploaded: {}", file_info);
                Ok(UploadedMediaInfo::new(file_info))
            }
            _ => {
                log::error!("❌ Upload failed: {}", response.body);
                Err(AppError::upload(response.body.clone()))
            }
        }
    }
}
