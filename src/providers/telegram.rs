use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{debug, error};

pub struct Telegram {
    bot: Bot,
    chat_id: ChatId,
}

impl Telegram {
    pub fn new(token: &str, chat_id: i64) -> Self {
        Telegram {
            bot: Bot::new(token.to_string()),
            chat_id: ChatId(chat_id),
        }
    }

    /// Deliver `text` to the configured chat. Delivery faults are logged and
    /// swallowed; the polling loop never reacts to a failed send.
    pub async fn send_message(&self, text: &str) {
        match self.bot.send_message(self.chat_id, text).await {
            Ok(_) => debug!("message delivered to chat: {}", text),
            Err(e) => error!("failed to deliver telegram message: {}", e),
        }
    }
}
