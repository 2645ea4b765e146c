use std::sync::Arc;

use tdlib::enums::{self, ChatAction, InputMessageContent, MessageReplyTo, TextParseMode};
use tdlib::functions;
use tdlib::types::{
    FormattedText, InputMessageText, Message, MessageReplyToMessage, TextParseModeMarkdown,
};

use super::bot_state::BotState;
use super::cache::{CompactChat, CompactUser};
use crate::bot::TdResult;

pub struct CommandContext {
    pub client_id: i32,
    pub chat: CompactChat,
    pub user: CompactUser,
    pub message: Message,
    pub bot_state: Arc<BotState>,
}

impl CommandContext {
    pub async fn reply_formatted_text(&self, text: FormattedText) -> TdResult<Message> {
        let enums::Message::Message(message) = functions::send_message(
            self.message.chat_id,
            self.message.message_thread_id,
            Some(MessageReplyTo::Message(MessageReplyToMessage {
                chat_id: self.message.chat_id,
                message_id: self.message.id,
            })),
            None,
            None,
            InputMessageContent::InputMessageText(InputMessageText {
                text,
                disable_web_page_preview: true,
                ..Default::default()
            }),
            self.client_id,
        )
        .await?;

        Ok(message)
    }

    pub async fn reply(&self, text: String) -> TdResult<Message> {
        self.reply_formatted_text(FormattedText { text, ..Default::default() }).await
    }

    /// Replies with Telegram MarkdownV2 text. Reserved characters must already be escaped.
    pub async fn reply_markdown(&self, text: String) -> TdResult<Message> {
        let enums::FormattedText::FormattedText(formatted_text) = functions::parse_text_entities(
            text,
            TextParseMode::Markdown(TextParseModeMarkdown { version: 2 }),
            self.client_id,
        )
        .await?;

        self.reply_formatted_text(formatted_text).await
    }

    pub async fn send_typing(&self) -> TdResult<()> {
        functions::send_chat_action(
            self.message.chat_id,
            self.message.message_thread_id,
            Some(ChatAction::Typing),
            self.client_id,
        )
        .await
    }
}
