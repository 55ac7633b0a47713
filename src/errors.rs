use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {response}")]
    Authentication { response: String },

    #[error("Upload failed: {response}")]
    Upload { response: String },

    #[error("Send failed: {response}")]
    Dispatch { response: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn authentication(response: impl Into<String>) -> Self {
        Self::Authentication {
            response: response.into(),
        }
    }

    pub fn upload(response: impl Into<String>) -> Self {
        Self::Upload {
            response: response.into(),
        }
    }

    pub fn dispatch(response: impl Into<String>) -> Self {
        Self::Dispatch {
            response: response.into(),
        }
    }

    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::FileNotFound {
            path: path.to_string(),
        }
    }

    /// Name of the workflow step an error belongs to, used in the final report.
    pub fn stage(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "token",
            AppError::Upload { .. } => "upload",
            AppError::Dispatch { .. } => "send",
            AppError::Network(_) | AppError::Json(_) => "transport",
            AppError::Io(_) | AppError::FileNotFound { .. } => "file",
            AppError::Validation { .. } | AppError::Config(_) => "config",
        }
    }

    /// Errors that stop the run before any request reaches the platform.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::Io(_)
                | AppError::FileNotFound { .. }
                | AppError::Validation { .. }
                | AppError::Config(_)
        )
    }
}
