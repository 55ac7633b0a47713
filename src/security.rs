use regex::Regex;
use std::path::Path;

use crate::errors::{AppError, AppResult};

const MAX_TARGET_ID_LEN: usize = 128;

pub struct InputValidator;

impl InputValidator {
    /// Target ids are interpolated into endpoint paths, so only plain
    /// identifier characters are accepted.
    pub fn validate_target_id(id: &str) -> AppResult<()> {
        if id.is_empty() {
            return Err(AppError::validation("openid", "Target id cannot be empty"));
        }

        if id.len() > MAX_TARGET_ID_LEN {
            return Err(AppError::validation(
                "openid",
                "Target id too long (max 128 characters)",
            ));
        }

        let safe_chars = Regex::new(r"^[A-Za-z0-9_\-]+$")
            .map_err(|e| AppError::Config(format!("Invalid target id pattern: {}", e)))?;
        if !safe_chars.is_match(id) {
            return Err(AppError::validation(
                "openid",
                "Target id contains invalid characters",
            ));
        }

        Ok(())
    }

    pub fn validate_file_path(path: &str) -> AppResult<()> {
        if path.trim().is_empty() {
            return Err(AppError::validation("file_path", "File path cannot be empty"));
        }

        let path_obj = Path::new(path);

        if !path_obj.exists() {
            return Err(AppError::file_not_found(path));
        }

        if !path_obj.is_file() {
            return Err(AppError::validation("file_path", "Path is not a file"));
        }

        Ok(())
    }
}

/// Mask a secret for log and debug output, keeping only its length visible.
pub fn redact(secret: &str) -> String {
    if secret.is_empty() {
        "<empty>".to_string()
    } else {
        format!("<redacted {} chars>", secret.chars().count())
    }
}
