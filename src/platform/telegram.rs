use std::sync::Arc;

use anyhow::Result;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tracing::{debug, info};

use crate::platform::{IncomingMessage, Reply};
use crate::router::Router;

/// Run the Telegram bot platform
pub async fn run(router: Arc<Router>, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");

    // Only text messages with a known author reach the router
    let handler = Update::filter_message()
        .filter_map(|msg: Message| incoming(&msg))
        .endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|upd| async move {
            debug!("Ignoring update {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn incoming(msg: &Message) -> Option<IncomingMessage> {
    let user = msg.from.as_ref()?;
    Some(IncomingMessage {
        platform: "telegram".to_string(),
        user_id: user.id.0.to_string(),
        chat_id: msg.chat.id.0.to_string(),
        user_name: user.first_name.clone(),
        text: msg.text()?.to_string(),
    })
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    incoming: IncomingMessage,
    router: Arc<Router>,
) -> ResponseResult<()> {
    let replies = router.on_message(&incoming).await;
    if replies.is_empty() {
        return Ok(());
    }

    info!(
        "Sending {} repl{} to chat {} for {}",
        replies.len(),
        if replies.len() == 1 { "y" } else { "ies" },
        incoming.chat_id,
        incoming.user_name
    );
    for reply in replies {
        send_reply(&bot, msg.chat.id, reply).await?;
    }

    Ok(())
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<()> {
    debug!("Replying to {}: {}", chat_id, reply.body());
    let (text, parse_mode) = outgoing(&reply);
    let request = bot.send_message(chat_id, text);
    match parse_mode {
        Some(mode) => request.parse_mode(mode).await?,
        None => request.await?,
    };
    Ok(())
}

/// Message text and parse mode for a reply. Monospace goes out as an HTML
/// `<pre>` block with its content escaped; plain text is sent as-is.
fn outgoing(reply: &Reply) -> (String, Option<ParseMode>) {
    match reply {
        Reply::Text(text) => (text.clone(), None),
        Reply::Monospace(text) => (html::code_block(text), Some(ParseMode::Html)),
    }
}
