use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use crate::commands::{CommandDispatcher, Invocation};
use crate::market::MarketData;
use crate::platform::{IncomingMessage, Reply};
use crate::ticker;

/// Routes every inbound message to a command or to the ticker scan.
/// Platform-agnostic: receives IncomingMessage, returns the replies to send.
pub struct Router {
    bot_user_id: String,
    prefix: String,
    commands: CommandDispatcher,
    market: Arc<dyn MarketData>,
}

impl Router {
    pub fn new(
        bot_user_id: impl Into<String>,
        prefix: impl Into<String>,
        commands: CommandDispatcher,
        market: Arc<dyn MarketData>,
    ) -> Self {
        Self {
            bot_user_id: bot_user_id.into(),
            prefix: prefix.into(),
            commands,
            market,
        }
    }

    /// Replies for one message, in send order
    pub async fn on_message(&self, msg: &IncomingMessage) -> Vec<Reply> {
        // Ignore our own messages
        if msg.user_id == self.bot_user_id {
            return Vec::new();
        }

        if let Some(rest) = msg.text.strip_prefix(self.prefix.as_str()) {
            let Some(invocation) = Invocation::parse(rest) else {
                debug!("Prefix without command from {} on {}", msg.user_name, msg.platform);
                return Vec::new();
            };
            return self.commands.dispatch(&invocation).await.into_iter().collect();
        }

        let symbols = ticker::extract_tickers(&msg.text);
        if symbols.is_empty() {
            return Vec::new();
        }

        info!("[Event] Stock Ticker Found: {}", symbols.join(", "));
        join_all(
            symbols
                .iter()
                .map(|symbol| ticker::lookup(self.market.as_ref(), symbol)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::FakeImages;
    use crate::market::PriceBar;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    const BOT_ID: &str = "42";

    /// Market fake: a flat 100-row history for every symbol except "FAIL"
    #[derive(Default)]
    struct FakeMarket {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MarketData for FakeMarket {
        async fn history(&self, symbol: &str) -> Result<Vec<PriceBar>> {
            self.requested.lock().unwrap().push(symbol.to_string());
            if symbol == "FAIL" {
                anyhow::bail!("No data found, symbol may be delisted");
            }
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok((0..100)
                .map(|i| PriceBar {
                    date: start + chrono::Duration::days(i),
                    close: 20.0,
                })
                .collect())
        }
    }

    fn router(market: Arc<FakeMarket>, images: Arc<FakeImages>) -> Router {
        let commands = CommandDispatcher::new("!", "Basil", images);
        Router::new(BOT_ID, "!", commands, market)
    }

    fn message(user_id: &str, text: &str) -> IncomingMessage {
        IncomingMessage {
            platform: "test".to_string(),
            user_id: user_id.to_string(),
            chat_id: "chat-1".to_string(),
            user_name: "tester".to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_own_messages_ignored() {
        let market = Arc::new(FakeMarket::default());
        let images = FakeImages::with_urls(&["https://giphy.com/a"]);
        let router = router(market.clone(), images.clone());

        assert!(router.on_message(&message(BOT_ID, "$AAPL")).await.is_empty());
        assert!(router.on_message(&message(BOT_ID, "!random cat")).await.is_empty());
        assert!(router.on_message(&message(BOT_ID, "!odds 10 5")).await.is_empty());
        assert!(market.requested.lock().unwrap().is_empty());
        assert_eq!(images.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prefix_takes_precedence_over_tickers() {
        let market = Arc::new(FakeMarket::default());
        let router = router(market.clone(), FakeImages::with_urls(&[]));

        assert!(router.on_message(&message("7", "!unknown $AAPL")).await.is_empty());
        let replies = router.on_message(&message("7", "!odds 5 $TSLA")).await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].body().contains("whole numbers"));
        assert!(market.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_reply_per_ticker_in_order() {
        let market = Arc::new(FakeMarket::default());
        let router = router(market.clone(), FakeImages::with_urls(&[]));

        let replies = router
            .on_message(&message("7", "Check out $AAPL and $TSLA today, not $AB or $TOOLONG"))
            .await;
        assert_eq!(replies.len(), 2);
        assert!(replies[0].body().starts_with("Ticker: AAPL\n"));
        assert!(replies[1].body().starts_with("Ticker: TSLA\n"));
        assert_eq!(*market.requested.lock().unwrap(), vec!["AAPL", "TSLA"]);
    }

    #[tokio::test]
    async fn test_failed_lookup_does_not_affect_others() {
        let router = router(Arc::new(FakeMarket::default()), FakeImages::with_urls(&[]));

        let replies = router.on_message(&message("7", "$FAIL vs $GME")).await;
        assert_eq!(replies.len(), 2);
        assert_eq!(
            replies[0],
            Reply::text("Sorry, market data is temporarily unavailable. Please try again later.")
        );
        assert!(matches!(replies[1], Reply::Monospace(_)));
    }

    #[tokio::test]
    async fn test_plain_chatter_is_silent() {
        let router = router(Arc::new(FakeMarket::default()), FakeImages::with_urls(&[]));
        assert!(router.on_message(&message("7", "hello there")).await.is_empty());
        assert!(router.on_message(&message("7", "!")).await.is_empty());
        assert!(router.on_message(&message("7", "! random")).await.is_empty());
    }

    #[tokio::test]
    async fn test_command_reply() {
        let images = FakeImages::with_urls(&["https://giphy.com/fat-mac"]);
        let router = router(Arc::new(FakeMarket::default()), images);
        let replies = router.on_message(&message("7", "!random fat mac")).await;
        assert_eq!(replies, vec![Reply::text("https://giphy.com/fat-mac")]);
    }
}
