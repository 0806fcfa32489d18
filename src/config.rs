use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Environment variable that overrides `[telegram] bot_token`.
pub const BOT_TOKEN_ENV: &str = "BASIL_BOT_TOKEN";
/// Environment variable that overrides `[giphy] api_key`.
pub const GIPHY_KEY_ENV: &str = "GIPHY_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub giphy: GiphyConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub bot: BotConfig,
    pub web: Option<WebConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GiphyConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_giphy_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_giphy_base_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    /// History window requested for ticker lookups (e.g. "6mo")
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default = "default_interval")]
    pub interval: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            range: default_range(),
            interval: default_interval(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    /// Name the bot uses for itself in replies
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            command_prefix: default_command_prefix(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub bind: SocketAddr,
}

fn default_giphy_base_url() -> String {
    "https://api.giphy.com/v1".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_range() -> String {
    "6mo".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_name() -> String {
    "Basil".to_string()
}

fn default_command_prefix() -> String {
    "!".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse TOML content, letting `env` supply secret overrides.
    pub fn parse<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config =
            toml::from_str(content).context("Failed to parse config file")?;

        if let Some(token) = env(BOT_TOKEN_ENV).filter(|v| !v.is_empty()) {
            config.telegram.bot_token = token;
        }
        if let Some(key) = env(GIPHY_KEY_ENV).filter(|v| !v.is_empty()) {
            config.giphy.api_key = key;
        }

        if config.telegram.bot_token.trim().is_empty() {
            anyhow::bail!(
                "No bot token configured: set [telegram] bot_token or {}",
                BOT_TOKEN_ENV
            );
        }
        if config.bot.command_prefix.is_empty() {
            anyhow::bail!("[bot] command_prefix must not be empty");
        }

        Ok(config)
    }
}
