use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use tracing::debug;
use yahoo_finance_api as yahoo;

use crate::config::MarketConfig;

/// One daily row of price history
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

/// Source of daily price history, oldest row first
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn history(&self, symbol: &str) -> Result<Vec<PriceBar>>;
}

pub struct YahooMarketData {
    connector: yahoo::YahooConnector,
    config: MarketConfig,
}

impl YahooMarketData {
    pub fn new(config: MarketConfig) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| anyhow::anyhow!("Failed to create Yahoo Finance connector: {}", e))?;
        Ok(Self { connector, config })
    }
}

#[async_trait]
impl MarketData for YahooMarketData {
    async fn history(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        debug!(
            "Fetching {} history for {} at {} interval",
            self.config.range, symbol, self.config.interval
        );

        let response = self
            .connector
            .get_quote_range(symbol, &self.config.interval, &self.config.range)
            .await
            .map_err(|e| anyhow::anyhow!("Yahoo Finance request for {} failed: {}", symbol, e))?;

        let quotes = response
            .quotes()
            .map_err(|e| anyhow::anyhow!("No quotes in Yahoo Finance response for {}: {}", symbol, e))?;

        quotes
            .iter()
            .map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)
                    .with_context(|| format!("Invalid quote timestamp: {}", q.timestamp))?
                    .date_naive();
                Ok(PriceBar {
                    date,
                    close: q.close,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_yahoo_history() {
        let market = YahooMarketData::new(MarketConfig::default()).unwrap();
        let history = market.history("AAPL").await.unwrap();
        assert!(history.len() > 90);
        assert!(history.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
