use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{AppError, AppResult};
use crate::security::redact;

pub const DEFAULT_TOKEN_URL: &str = "https://bots.qq.com/app/getAppAccessToken";
const SANDBOX_API_BASE: &str = "https://sandbox.api.sgroup.qq.com";
const PRODUCTION_API_BASE: &str = "https://api.sgroup.qq.com";

pub const ENV_APP_ID: &str = "QQ_BOT_APP_ID";
pub const ENV_APP_SECRET: &str = "QQ_BOT_SECRET";
pub const ENV_SANDBOX: &str = "QQ_BOT_SANDBOX";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    pub fn api_base(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_API_BASE,
            Environment::Production => PRODUCTION_API_BASE,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Application identity used to obtain an access token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
    pub environment: Environment,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &redact(&self.app_secret))
            .field("environment", &self.environment)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app_id: String,
    pub app_secret: String,
    pub sandbox: bool,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub token_url: String,
    pub api_base: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            sandbox: true,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_id", &self.app_id)
            .field("app_secret", &redact(&self.app_secret))
            .field("sandbox", &self.sandbox)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .field("token_url", &self.token_url)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Config {
    pub fn environment(&self) -> Environment {
        Environment::from_sandbox_flag(self.sandbox)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            app_id: self.app_id.clone(),
            app_secret: self.app_secret.clone(),
            environment: self.environment(),
        }
    }

    /// Host for the files and messages endpoints, without a trailing slash.
    pub fn api_base(&self) -> String {
        match &self.api_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => self.environment().api_base().to_string(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Overlay values taken from `lookup`, which is normally `std::env::var`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(app_id) = lookup(ENV_APP_ID) {
            self.app_id = app_id;
        }
        if let Some(app_secret) = lookup(ENV_APP_SECRET) {
            self.app_secret = app_secret;
        }
        if let Some(sandbox) = lookup(ENV_SANDBOX) {
            self.sandbox = sandbox.trim().eq_ignore_ascii_case("true");
        }
    }
}

pub fn get_config_path() -> AppResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Config("Could not find config directory".to_string()))?
        .join("qqbot-media-sender");

    Ok(config_dir.join("config.json"))
}

pub fn read_config_file(path: &Path) -> AppResult<Config> {
    let config_str = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&config_str)?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Build the configuration for one invocation: defaults, then the config
/// file, then the process environment.
pub fn load_config(explicit_path: Option<&Path>) -> AppResult<Config> {
    let mut config = match explicit_path {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            read_config_file(path)?
        }
        None => {
            let default_path = get_config_path()?;
            if default_path.exists() {
                read_config_file(&default_path)?
            } else {
                log::debug!(
                    "No config file at {}, using environment only",
                    default_path.display()
                );
                Config::default()
            }
        }
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> AppResult<()> {
    if config.app_id.trim().is_empty() {
        return Err(AppError::validation(
            "app_id",
            "Must be set in the config file or QQ_BOT_APP_ID",
        ));
    }

    if config.app_secret.trim().is_empty() {
        return Err(AppError::validation(
            "app_secret",
            "Must be set in the config file or QQ_BOT_SECRET",
        ));
    }

    if config.request_timeout_secs == 0 || config.request_timeout_secs > 600 {
        return Err(AppError::validation(
            "request_timeout_secs",
            "Must be between 1 and 600",
        ));
    }

    let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
    if !valid_log_levels.contains(&config.log_level.as_str()) {
        return Err(AppError::validation("log_level", "Must be a valid log level"));
    }

    if config.token_url.trim().is_empty() {
        return Err(AppError::validation("token_url", "Cannot be empty"));
    }

    if let Some(base) = &config.api_base {
        if !base.starts_with("https://") && !base.starts_with("http://") {
            return Err(AppError::validation("api_base", "Must be an http(s) URL"));
        }
    }

    Ok(())
}
