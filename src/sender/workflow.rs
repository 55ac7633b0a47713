use super::auth::CredentialProvider;
use super::dispatcher::{MessageDispatcher, MessageTarget};
use super::media::{MediaFile, MediaTypeClass, MediaVariant};
use super::transport::{HttpTransport, ReqwestTransport};
use super::uploader::MediaUploader;
use crate::config::Config;
use crate::errors::AppResult;
use crate::security::InputValidator;

#[derive(Debug, Clone)]
pub struct SendRequest {
    pub file_path: String,
    pub target: MessageTarget,
    /// Use the image upload and envelope shape when the file is an image.
    pub as_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    pub file_path: String,
    pub target: MessageTarget,
    pub class: MediaTypeClass,
    pub variant: MediaVariant,
    pub bytes: usize,
}

/// One token → upload → send run. Nothing is kept between runs.
pub struct SendWorkflow<'a> {
    config: &'a Config,
    transport: &'a dyn HttpTransport,
}

impl<'a> SendWorkflow<'a> {
    pub fn new(config: &'a Config, transport: &'a dyn HttpTransport) -> Self {
        Self { config, transport }
    }

    pub async fn run(&self, request: &SendRequest) -> AppResult<SendReport> {
        InputValidator::validate_target_id(&request.target.id)?;

        // Read the file completely before touching the network.
        let file = MediaFile::load(&request.file_path).await?;
        let class = file.class();
        let variant = MediaVariant::select(class, request.as_image);
        if request.as_image && variant != MediaVariant::Image {
            log::warn!(
                "{} is classified as {}, sending it as a generic file",
                request.file_path,
                class
            );
        }

        log::info!("Sending file: {} ({}, {} bytes)", file.path(), class, file.len());
        log::info!("To: {}", request.target);

        log::info!("[1/3] Getting access token...");
        let provider = CredentialProvider::new(self.transport, self.config.token_url.as_str());
        let token = provider.acquire_token(&self.config.credentials()).await?;
        log::info!("[OK] Token obtained");

        let api_base = self.config.api_base();

        log::info!("[2/3] Uploading file...");
        let uploader = MediaUploader::new(self.transport, api_base.as_str(), self.config.app_id.as_str());
        let media = uploader.upload(&token, &file, variant).await?;

        log::info!("[3/3] Sending message...");
        let dispatcher =
            MessageDispatcher::new(self.transport, api_base.as_str(), self.config.app_id.as_str());
        dispatcher
            .send(&token, &request.target, media, variant)
            .await?;

        Ok(SendReport {
            file_path: request.file_path.clone(),
            target: request.target.clone(),
            class,
            variant,
            bytes: file.len(),
        })
    }
}

/// Run one send over a real HTTP client built from `config`.
pub async fn send_file(config: &Config, request: &SendRequest) -> AppResult<SendReport> {
    let transport = ReqwestTransport::new(config.request_timeout())?;
    SendWorkflow::new(config, &transport).run(request).await
}
