use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::io;
use std::path::Path;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod error;
mod flow;
mod models;
mod services;
mod state;

use crate::config::BotConfig;
use crate::flow::FlowController;
use crate::services::notification_service::NotificationService;
use crate::state::AppState;

fn log_file_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("bot.log")
        .build(log_dir)
        .with_context(|| format!("Failed to open log directory {}", log_dir.display()))
}

fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file_appender(log_dir)?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftshop_bot=info,teloxide=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _guard = init_tracing(&config::log_dir_from(std::env::var("LOG_DIR").ok()))?;

    info!("Starting gift shop bot...");

    let config = Arc::new(BotConfig::from_env().context("Failed to load configuration")?);
    info!("Writing logs to {}", config.log_dir.join("bot.log").display());
    if config.operator_chat_id.is_none() {
        warn!("OPERATOR_CHAT_ID is not set, payment proof will not be forwarded");
    }

    let bot = Bot::new(config.token.clone());

    let state = AppState {
        flow: FlowController::new(config.clone()),
        notifications: NotificationService::new(bot.clone(), config.operator_chat_id),
    };

    let (tx, rx) = tokio::sync::broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(());
        }
    });

    bot::run_bot(bot, rx, state).await;
    info!("Gift shop bot stopped");
    Ok(())
}
