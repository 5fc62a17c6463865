//! 本地控制台通道：从 stdin 逐行读取，回复打印到 stdout
//!
//! 输入约定：`/命令` 与 Telegram 一致；`::callback_data` 模拟按下按钮（如 `::batch_mode_random`）；其余为自由文本。
//! 因此自由文本（如自定义名字列表）不能以 `::` 开头。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Channel;
use crate::bot::{Event, MailBot, Reply};
use crate::session::UserIdentity;

/// 按钮输入前缀
pub const BUTTON_PREFIX: &str = "::";

/// 控制台通道，固定一个本地用户身份
pub struct ConsoleChannel {
    user: UserIdentity,
}

impl ConsoleChannel {
    pub fn new(user: UserIdentity) -> Self {
        Self { user }
    }
}

/// 解析一行控制台输入；空行与未知命令返回 None
pub fn parse_line(line: &str) -> Option<Event> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if line.trim().is_empty() {
        return None;
    }
    if let Some(data) = line.trim().strip_prefix(BUTTON_PREFIX) {
        return Some(Event::from_callback_data(data.trim()));
    }
    Event::from_message_text(line)
}

/// 渲染为纯文本：正文 + 按钮列表（`[::callback_data] 标签`）
pub fn render(reply: &Reply) -> String {
    if reply.alert {
        return format!("(!) {}", reply.text);
    }
    let mut out = reply.text.clone();
    if let Some(keyboard) = reply.keyboard {
        out.push('\n');
        for action in keyboard.rows().into_iter().flatten() {
            out.push_str(&format!(
                "\n  [{BUTTON_PREFIX}{}] {}",
                action.callback_data(),
                action.label()
            ));
        }
    }
    out
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn run(&self, bot: Arc<MailBot>) -> anyhow::Result<()> {
        tracing::info!(user_id = %self.user.id, "Console channel started, type /start");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let Some(event) = parse_line(&line) else {
                continue;
            };
            let reply = bot.handle(&self.user, event).await;
            println!("{}\n", render(&reply));
        }
        tracing::info!("Console input closed");
        Ok(())
    }
}
