//! 入站事件：斜杠命令、按钮回调、自由文本

/// 支持的斜杠命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Menu,
    Single,
    Batch,
    Inbox,
    Domain,
    Info,
}

impl Command {
    /// 解析 `/cmd`、`/cmd@botname`、`/cmd 参数`；未知命令返回 None
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_addressed(text, None)
    }

    /// 同 `parse`，但 `@botname` 后缀必须是本机器人（不区分大小写），发给其它机器人的命令返回 None。
    /// `bot_username` 为 None 时不校验后缀。
    pub fn parse_addressed(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let word = text.trim().strip_prefix('/')?.split_whitespace().next()?;
        let (name, target) = match word.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (word, None),
        };
        if let (Some(target), Some(me)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(me.trim_start_matches('@')) {
                return None;
            }
        }
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "menu" => Some(Self::Menu),
            "single" => Some(Self::Single),
            "batch" => Some(Self::Batch),
            "inbox" => Some(Self::Inbox),
            "domain" => Some(Self::Domain),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Menu => "menu",
            Self::Single => "single",
            Self::Batch => "batch",
            Self::Inbox => "inbox",
            Self::Domain => "domain",
            Self::Info => "info",
        }
    }

    pub fn all() -> [Command; 7] {
        [
            Self::Start,
            Self::Menu,
            Self::Single,
            Self::Batch,
            Self::Inbox,
            Self::Domain,
            Self::Info,
        ]
    }
}

/// 内联键盘按钮（callback_data 与之一一对应）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Single,
    Batch,
    Inbox,
    SetDomain,
    Info,
    BatchRandom,
    BatchCustom,
}

impl MenuAction {
    pub fn callback_data(&self) -> &'static str {
        match self {
            Self::Single => "menu_single",
            Self::Batch => "menu_batch",
            Self::Inbox => "menu_inbox",
            Self::SetDomain => "menu_set_domain",
            Self::Info => "menu_info",
            Self::BatchRandom => "batch_mode_random",
            Self::BatchCustom => "batch_mode_custom",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            "menu_single" => Some(Self::Single),
            "menu_batch" => Some(Self::Batch),
            "menu_inbox" => Some(Self::Inbox),
            "menu_set_domain" => Some(Self::SetDomain),
            "menu_info" => Some(Self::Info),
            "batch_mode_random" => Some(Self::BatchRandom),
            "batch_mode_custom" => Some(Self::BatchCustom),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "📧 Generate 1 Email",
            Self::Batch => "📦 Batch Email",
            Self::Inbox => "📥 Check Inbox",
            Self::SetDomain => "⚙️ Set Domain",
            Self::Info => "ℹ️ Info & Stats",
            Self::BatchRandom => "🎲 Random Names",
            Self::BatchCustom => "✏️ Custom Names (send list)",
        }
    }
}

/// 交给 MailBot 处理的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    Menu(MenuAction),
    /// 无法识别的回调数据（旧键盘等）
    UnknownCallback(String),
    Text(String),
}

impl Event {
    /// 普通消息：以 `/` 开头按命令解析（未知命令忽略，返回 None），否则为自由文本
    pub fn from_message_text(text: &str) -> Option<Self> {
        Self::from_message_text_for(text, None)
    }

    /// 同 `from_message_text`，发给其它机器人的命令（`/cmd@other_bot`）同样忽略
    pub fn from_message_text_for(text: &str, bot_username: Option<&str>) -> Option<Self> {
        if text.trim_start().starts_with('/') {
            let parsed = Command::parse_addressed(text, bot_username).map(Event::Command);
            if parsed.is_none() {
                tracing::debug!("Ignoring command not meant for this bot: {}", text.trim());
            }
            return parsed;
        }
        Some(Event::Text(text.to_string()))
    }

    pub fn from_callback_data(data: &str) -> Self {
        match MenuAction::from_callback_data(data) {
            Some(action) => Event::Menu(action),
            None => Event::UnknownCallback(data.to_string()),
        }
    }
}
