//! Telegram Bot API 集成
//!
//! 通过 getUpdates 长轮询接收消息与按钮回调，交给 MailBot 处理后回复：
//! 普通消息用 sendMessage；按钮回调先 answerCallbackQuery，再 editMessageText 原消息（失败时改为新发一条）。
//! 同一批 update 按 update_id 顺序串行处理，保证同一用户的事件不乱序。
//! 回复以 Markdown 发送；Telegram 无法解析实体时改为纯文本重发。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::Channel;
use crate::bot::{Event, Keyboard, MailBot, Reply};
use crate::config::TelegramSection;
use crate::session::UserIdentity;

/// 普通 API 调用的超时
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// 轮询 / 解析失败后的退避时间
const RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Markdown 实体解析失败时 Bot API 返回的描述片段
const PARSE_ENTITIES_ERROR: &str = "can't parse entities";

/// Bot API 统一响应包装
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<TgMessage>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct TgMessage {
    pub message_id: i64,
    pub chat: TgChat,
    pub from: Option<TgUser>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TgChat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: TgUser,
    pub message: Option<TgMessage>,
    pub data: Option<String>,
}

impl From<&TgUser> for UserIdentity {
    fn from(user: &TgUser) -> Self {
        let identity = UserIdentity::new(user.id.to_string(), user.first_name.clone());
        match &user.last_name {
            Some(last) => identity.with_last_name(last.clone()),
            None => identity,
        }
    }
}

/// 事件来源：决定回复方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Message,
    Callback {
        query_id: String,
        /// 按钮所在消息，用于原地编辑
        message_id: Option<i64>,
    },
}

/// 从 update 解析出的入站事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub user: UserIdentity,
    pub chat_id: i64,
    pub origin: Origin,
    pub event: Event,
}

/// 把 update 转为入站事件；非文本消息、无发送者的消息、未知命令、发给其它机器人的命令返回 None
pub fn incoming_from_update(update: Update, bot_username: Option<&str>) -> Option<Incoming> {
    if let Some(query) = update.callback_query {
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(query.from.id);
        return Some(Incoming {
            user: UserIdentity::from(&query.from),
            chat_id,
            origin: Origin::Callback {
                query_id: query.id,
                message_id: query.message.as_ref().map(|m| m.message_id),
            },
            event: Event::from_callback_data(query.data.as_deref().unwrap_or_default()),
        });
    }

    let message = update.message?;
    let from = message.from.as_ref()?;
    let text = message.text.as_deref()?;
    let event = Event::from_message_text_for(text, bot_username)?;
    Some(Incoming {
        user: UserIdentity::from(from),
        chat_id: message.chat.id,
        origin: Origin::Message,
        event,
    })
}

/// 内联键盘的 reply_markup
pub fn inline_keyboard(keyboard: Keyboard) -> serde_json::Value {
    let rows: Vec<Vec<serde_json::Value>> = keyboard
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|action| {
                    json!({
                        "text": action.label(),
                        "callback_data": action.callback_data(),
                    })
                })
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}

fn message_body(chat_id: i64, reply: &Reply, markdown: bool) -> serde_json::Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": reply.text,
    });
    if markdown {
        body["parse_mode"] = json!("Markdown");
    }
    if let Some(keyboard) = reply.keyboard {
        body["reply_markup"] = inline_keyboard(keyboard);
    }
    body
}

fn is_parse_entities_error(err: &anyhow::Error) -> bool {
    err.to_string().contains(PARSE_ENTITIES_ERROR)
}

/// Telegram channel：长轮询 Bot API
pub struct TelegramChannel {
    bot_token: String,
    api_base_url: String,
    poll_timeout_secs: u64,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String, section: &TelegramSection) -> Self {
        Self {
            bot_token,
            api_base_url: section.api_base_url.trim_end_matches('/').to_string(),
            poll_timeout_secs: section.poll_timeout_secs,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base_url, self.bot_token)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> anyhow::Result<T> {
        let resp: ApiResponse<T> = self
            .client
            .post(self.api_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            anyhow::bail!(
                "Telegram {method} failed: {}",
                resp.description.unwrap_or_default()
            );
        }
        resp.result
            .with_context(|| format!("Telegram {method} returned no result"))
    }

    async fn get_updates(&self, offset: i64) -> anyhow::Result<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": self.poll_timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        let timeout = Duration::from_secs(self.poll_timeout_secs) + REQUEST_TIMEOUT;
        self.call("getUpdates", &body, timeout).await
    }

    async fn send_message(&self, chat_id: i64, reply: &Reply) -> anyhow::Result<()> {
        let sent: anyhow::Result<serde_json::Value> = self
            .call("sendMessage", &message_body(chat_id, reply, true), REQUEST_TIMEOUT)
            .await;
        match sent {
            Err(e) if is_parse_entities_error(&e) => {
                tracing::warn!("Markdown rejected for chat {}, resending as plain text: {:#}", chat_id, e);
                let _: serde_json::Value = self
                    .call("sendMessage", &message_body(chat_id, reply, false), REQUEST_TIMEOUT)
                    .await?;
                Ok(())
            }
            sent => sent.map(|_| ()),
        }
    }

    async fn edit_message(&self, chat_id: i64, message_id: i64, reply: &Reply) -> anyhow::Result<()> {
        let mut body = message_body(chat_id, reply, true);
        body["message_id"] = json!(message_id);
        let _: serde_json::Value = self.call("editMessageText", &body, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str, text: Option<&str>, show_alert: bool) -> anyhow::Result<()> {
        let mut body = json!({
            "callback_query_id": query_id,
            "show_alert": show_alert,
        });
        if let Some(text) = text {
            body["text"] = json!(text);
        }
        let _: bool = self.call("answerCallbackQuery", &body, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    async fn deliver(&self, chat_id: i64, origin: &Origin, reply: &Reply) -> anyhow::Result<()> {
        match origin {
            Origin::Message => self.send_message(chat_id, reply).await,
            Origin::Callback { query_id, message_id } => {
                if reply.alert {
                    return self.answer_callback(query_id, Some(&reply.text), true).await;
                }
                if let Err(e) = self.answer_callback(query_id, None, false).await {
                    tracing::warn!("Telegram answerCallbackQuery failed: {:#}", e);
                }
                match message_id {
                    Some(message_id) => {
                        if let Err(e) = self.edit_message(chat_id, *message_id, reply).await {
                            tracing::debug!("Edit failed, sending new message instead: {:#}", e);
                            return self.send_message(chat_id, reply).await;
                        }
                        Ok(())
                    }
                    None => self.send_message(chat_id, reply).await,
                }
            }
        }
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn run(&self, bot: Arc<MailBot>) -> anyhow::Result<()> {
        let me: TgUser = self
            .call("getMe", &json!({}), REQUEST_TIMEOUT)
            .await
            .context("Telegram getMe failed, check the bot token")?;
        tracing::info!(
            "Telegram channel listening as @{}",
            me.username.as_deref().unwrap_or(&me.first_name)
        );
        let bot_username = me.username.as_deref();

        let mut offset: i64 = 0;
        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!("Telegram poll error: {:#}", e);
                    tokio::time::sleep(RETRY_BACKOFF).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(incoming) = incoming_from_update(update, bot_username) else {
                    continue;
                };
                let reply = bot.handle(&incoming.user, incoming.event).await;
                if let Err(e) = self.deliver(incoming.chat_id, &incoming.origin, &reply).await {
                    tracing::error!("Failed to send Telegram reply to chat {}: {:#}", incoming.chat_id, e);
                }
            }
        }
    }
}
