use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use qqbot_media_sender::config;
use qqbot_media_sender::errors::AppError;
use qqbot_media_sender::security::InputValidator;
use qqbot_media_sender::{send_file, MessageTarget, SendRequest};

/// Send a local file to a QQ Bot user or group as a rich-media message.
#[derive(Parser, Debug)]
#[command(name = "qqbot-send", version)]
struct Cli {
    /// File to upload (image, video, audio or any document)
    file_path: String,

    /// openid of the receiving user or group
    openid: String,

    /// Send to a group conversation instead of a user
    #[arg(long)]
    group: bool,

    /// Use the image message shape when the file is an image
    #[arg(long)]
    image: bool,

    /// Read configuration from this JSON file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Talk to the production API host regardless of QQ_BOT_SANDBOX
    #[arg(long)]
    production: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = config::load_config(cli.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::new()
        .parse_filters(&level)
        .parse_default_env()
        .init();

    match run(cli, loaded).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn failure_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<AppError>() {
        Some(app_error) if app_error.is_local() => format!("❌ Nothing was sent: {:#}", e),
        Some(app_error) => format!("❌ Failed at {} step: {:#}", app_error.stage(), e),
        None => format!("❌ Failed at setup step: {:#}", e),
    }
}

async fn run(cli: Cli, loaded: Result<config::Config, AppError>) -> anyhow::Result<()> {
    let mut config = loaded.context("Could not load configuration")?;
    if cli.production {
        config.sandbox = false;
    }

    InputValidator::validate_file_path(&cli.file_path)?;

    let target = if cli.group {
        MessageTarget::group(cli.openid)
    } else {
        MessageTarget::user(cli.openid)
    };

    log::info!("Using {} environment ({})", config.environment(), config.api_base());
    log::debug!("Effective configuration: {:?}", config);

    let request = SendRequest {
        file_path: cli.file_path,
        target,
        as_image: cli.image,
    };
    let report = send_file(&config, &request).await?;

    log::info!("{}", "=".repeat(50));
    log::info!(
        "🎉 {} sent successfully to {} ({} bytes)",
        report.class,
        report.target,
        report.bytes
    );
    log::info!("{}", "=".repeat(50));

    Ok(())
}
