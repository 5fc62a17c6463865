//! mailgen 本地控制台
//!
//! 不需要 Bot Token，在终端里用与 Telegram 相同的命令体验全部流程：
//! `/start`、`/single`、`/batch`、`/inbox`、`/domain`、`/info`，`::callback_data` 模拟按钮。
//!
//! 启动: cargo run --bin mailgen-console -- [config.toml]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mailgen::config::load_config;
use mailgen::integrations::{Channel, ConsoleChannel};
use mailgen::{observability, MailBot, UserIdentity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load config")?;
    cfg.validate().context("Invalid config")?;

    let name = std::env::var("USER").unwrap_or_else(|_| "console".to_string());
    let channel = ConsoleChannel::new(UserIdentity::new("console", name));
    let bot = Arc::new(MailBot::from_config(&cfg));

    channel.run(bot).await.context("Console channel failed")?;
    Ok(())
}
