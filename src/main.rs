mod commands;
mod config;
mod giphy;
mod market;
mod platform;
mod router;
mod ticker;
mod web;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::CommandDispatcher;
use crate::config::Config;
use crate::giphy::GiphyClient;
use crate::market::YahooMarketData;
use crate::router::Router;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,basil=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Bot name: {}", config.bot.name);
    info!("  Command prefix: {}", config.bot.command_prefix);
    info!("  Market history: {} at {}", config.market.range, config.market.interval);
    if config.giphy.api_key.is_empty() {
        warn!("  Giphy key: not set, gif search will fail");
    }

    let images = Arc::new(GiphyClient::new(config.giphy.clone())?);
    let market = Arc::new(YahooMarketData::new(config.market.clone())?);

    let bot = Bot::new(&config.telegram.bot_token);
    let me = bot
        .get_me()
        .await
        .context("Failed to log in to Telegram")?;
    info!("Logged in as {}", me.username());

    let commands = CommandDispatcher::new(&config.bot.command_prefix, &config.bot.name, images);
    let router = Arc::new(Router::new(
        me.id.0.to_string(),
        config.bot.command_prefix.clone(),
        commands,
        market,
    ));

    if let Some(web) = &config.web {
        let bind = web.bind;
        let username = me.username().to_string();
        tokio::spawn(async move {
            if let Err(e) = web::serve(bind, username).await {
                error!("Web endpoint failed: {:#}", e);
            }
        });
    }

    info!("Bot is starting...");
    platform::telegram::run(router, bot).await?;

    Ok(())
}
