//! mailgen - 临时邮箱生成机器人
//!
//! 模块划分：
//! - **bot**: 请求处理层（命令 / 按钮 / 自由文本 → 会话操作 → 回复）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型
//! - **integrations**: 传输通道（Telegram 长轮询、本地控制台）
//! - **mail**: 本地部分生成与清洗、收件箱链接
//! - **observability**: 日志初始化
//! - **session**: 会话模型、状态机、批量生成、内存存储

pub mod bot;
pub mod config;
pub mod core;
pub mod integrations;
pub mod mail;
pub mod observability;
pub mod session;

pub use bot::{Event, MailBot, Reply};
pub use session::{SessionStore, UserIdentity};
