//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `MAILGEN__*` 覆盖（双下划线表示嵌套，如 `MAILGEN__MAIL__DEFAULT_DOMAIN=mail.test`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::MailError;
use crate::session::validate_domain;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub mail: MailSection,
    #[serde(default)]
    pub telegram: TelegramSection,
}

/// [app] 段：机器人品牌名（欢迎语与信息页展示）
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_brand")]
    pub brand: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            brand: default_brand(),
        }
    }
}

fn default_brand() -> String {
    "VanzShop.id".to_string()
}

/// [mail] 段：新会话的默认域名、收件箱查看服务地址
#[derive(Debug, Clone, Deserialize)]
pub struct MailSection {
    #[serde(default = "default_domain")]
    pub default_domain: String,
    /// 收件箱链接为 `<inbox_base_url>/<编码后的邮箱>`
    #[serde(default = "default_inbox_base_url")]
    pub inbox_base_url: String,
}

impl Default for MailSection {
    fn default() -> Self {
        Self {
            default_domain: default_domain(),
            inbox_base_url: default_inbox_base_url(),
        }
    }
}

fn default_domain() -> String {
    "buybm.one".to_string()
}

fn default_inbox_base_url() -> String {
    "https://generator.email".to_string()
}

/// [telegram] 段：Bot Token、长轮询超时、API 地址
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSection {
    /// 未设置时回退到环境变量 TELEGRAM_TOKEN
    pub bot_token: Option<String>,
    /// getUpdates 长轮询超时（秒）
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for TelegramSection {
    fn default() -> Self {
        Self {
            bot_token: None,
            poll_timeout_secs: default_poll_timeout_secs(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

impl TelegramSection {
    /// 配置中的 token 优先，其次环境变量 TELEGRAM_TOKEN；空字符串视为未设置
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(std::env::var("TELEGRAM_TOKEN").ok())
    }

    fn resolve_token_with(&self, env_token: Option<String>) -> Option<String> {
        let non_empty = |t: &String| !t.trim().is_empty();
        self.bot_token
            .clone()
            .filter(non_empty)
            .or_else(|| env_token.filter(non_empty))
    }
}

impl AppConfig {
    /// 启动前校验：默认域名必须满足与 /domain 相同的规则
    pub fn validate(&self) -> Result<(), MailError> {
        validate_domain(&self.mail.default_domain)?;
        if self.mail.inbox_base_url.trim().is_empty() {
            return Err(MailError::Config("mail.inbox_base_url is empty".to_string()));
        }
        Ok(())
    }
}

/// 从 config 目录加载配置，环境变量 MAILGEN__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 MAILGEN__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        } else {
            tracing::warn!("Config file {:?} not found, ignoring", path);
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("MAILGEN")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValidationError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.brand, "VanzShop.id");
        assert_eq!(cfg.mail.default_domain, "buybm.one");
        assert_eq!(cfg.mail.inbox_base_url, "https://generator.email");
        assert_eq!(cfg.telegram.poll_timeout_secs, 30);
        assert!(cfg.telegram.bot_token.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_explicit_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[mail]\ndefault_domain = \"mail.test\"\n\n[telegram]\npoll_timeout_secs = 5"
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.mail.default_domain, "mail.test");
        assert_eq!(cfg.telegram.poll_timeout_secs, 5);
        assert_eq!(cfg.mail.inbox_base_url, "https://generator.email");
    }

    #[test]
    fn test_validate_rejects_bad_default_domain() {
        let mut cfg = AppConfig::default();
        cfg.mail.default_domain = "a@b".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(MailError::DefaultDomain(ValidationError::InvalidDomain(_)))
        ));

        cfg.mail.default_domain = "ab".to_string();
        assert!(cfg.validate().is_err());

        cfg.mail.default_domain = "buybm.one".to_string();
        cfg.mail.inbox_base_url = "  ".to_string();
        assert!(matches!(cfg.validate(), Err(MailError::Config(_))));
    }

    #[test]
    fn test_explicit_token_wins() {
        let section = TelegramSection {
            bot_token: Some("123:ABC".to_string()),
            ..TelegramSection::default()
        };
        assert_eq!(section.resolve_token().as_deref(), Some("123:ABC"));
        assert_eq!(
            section.resolve_token_with(Some("env-token".into())).as_deref(),
            Some("123:ABC")
        );
    }

    #[test]
    fn test_blank_token_falls_back_to_env() {
        for blank in ["", "   "] {
            let section = TelegramSection {
                bot_token: Some(blank.to_string()),
                ..TelegramSection::default()
            };
            assert_eq!(
                section.resolve_token_with(Some("env-token".into())).as_deref(),
                Some("env-token")
            );
            assert_eq!(section.resolve_token_with(Some(" ".into())), None);
            assert_eq!(section.resolve_token_with(None), None);
        }
    }
}
