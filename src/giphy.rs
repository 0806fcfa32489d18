use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::GiphyConfig;

/// Image search returning direct media URLs, best match first
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Gif>,
}

#[derive(Debug, Deserialize)]
struct Gif {
    url: String,
}

pub struct GiphyClient {
    client: reqwest::Client,
    config: GiphyConfig,
}

impl GiphyClient {
    pub fn new(config: GiphyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build Giphy HTTP client")?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageSearch for GiphyClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        let url = format!("{}/gifs/search", self.config.base_url);

        debug!("Searching Giphy for '{}' (limit {})", query, limit);

        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("q", query),
                ("limit", limit.as_str()),
                ("lang", self.config.language.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Giphy")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Giphy API error ({}): {}", status, error_body);
        }

        let search: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Giphy response")?;

        Ok(search.data.into_iter().map(|gif| gif.url).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{"data":[{"id":"x1","url":"https://giphy.com/gifs/x1"}],"meta":{"status":200}}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].url, "https://giphy.com/gifs/x1");
    }

    #[test]
    fn test_parse_empty_response() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"meta":{"status":200}}"#).unwrap();
        assert!(parsed.data.is_empty());
    }
}
