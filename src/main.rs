//! mailgen Telegram 机器人
//!
//! 入口：初始化日志、加载配置、创建 MailBot，并运行 Telegram 长轮询。
//!
//! 环境变量:
//! - TELEGRAM_TOKEN: Bot Token（也可在配置 [telegram].bot_token 中设置）
//! - MAILGEN__*: 覆盖配置项，如 MAILGEN__MAIL__DEFAULT_DOMAIN=mail.test
//!
//! 启动: cargo run -- [config.toml]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mailgen::config::load_config;
use mailgen::integrations::{Channel, TelegramChannel};
use mailgen::{observability, MailBot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load config")?;
    cfg.validate().context("Invalid config")?;

    let token = cfg
        .telegram
        .resolve_token()
        .context("TELEGRAM_TOKEN is not set (env TELEGRAM_TOKEN or [telegram].bot_token)")?;

    let bot = Arc::new(MailBot::from_config(&cfg));
    let channel = TelegramChannel::new(token, &cfg.telegram);

    tracing::info!(
        brand = %cfg.app.brand,
        default_domain = %cfg.mail.default_domain,
        "Starting mailgen on {}",
        channel.name()
    );

    // 会话只在内存中，退出即丢弃
    tokio::select! {
        result = channel.run(bot) => result.context("Telegram channel stopped")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
    }
    Ok(())
}
