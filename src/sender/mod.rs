// Sender module - token, upload and send steps for one rich-media message
//
// The steps run strictly in order: CredentialProvider -> MediaUploader -> MessageDispatcher

pub mod auth;
pub mod dispatcher;
pub mod media;
pub mod multipart;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;
pub mod uploader;
pub mod workflow;

pub use auth::{AccessToken, CredentialProvider};
pub use dispatcher::{MessageDispatcher, MessageTarget, RichMediaMessage, TargetKind};
pub use media::{MediaFile, MediaTypeClass, MediaVariant};
pub use multipart::{FilePart, UploadPayload};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody};
pub use uploader::{MediaUploader, UploadedMediaInfo};
pub use workflow::{send_file, SendReport, SendRequest, SendWorkflow};
