//! 外部集成：Telegram（长轮询）与本地控制台
//!
//! Channel 只负责把平台事件转换为 `bot::Event` 并投递回复，不持有会话状态。

pub mod console;
pub mod telegram;

use std::sync::Arc;

use async_trait::async_trait;

use crate::bot::MailBot;

/// 传输通道：接收事件、调用 MailBot、投递回复
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// 运行直到输入结束或出现不可恢复的错误
    async fn run(&self, bot: Arc<MailBot>) -> anyhow::Result<()>;
}

pub use console::ConsoleChannel;
pub use telegram::TelegramChannel;
