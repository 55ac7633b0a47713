//! Upload a local media file to the QQ Bot files API and send it as a
//! rich-media message to a user or group conversation.

pub mod config;
pub mod errors;
pub mod security;
pub mod sender;

pub use config::{Config, Credentials, Environment};
pub use errors::{AppError, AppResult};
pub use sender::{send_file, MessageTarget, SendReport, SendRequest, SendWorkflow};
