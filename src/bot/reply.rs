//! 回复载荷与文案
//!
//! Reply 与传输层无关：文本使用 Telegram 旧版 Markdown（反引号包裹地址），键盘由各 Channel 自行渲染。
//! 插入文案的用户名、域名、链接等一律经过 `escape_markdown` / `code` / `bold`，不能直接拼接。

use crate::core::{PreconditionError, ValidationError};
use crate::session::{BatchOutcome, SessionInfo, MAX_BATCH_COUNT};

use super::event::MenuAction;

/// 回复附带的内联键盘
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    MainMenu,
    /// 批量数量确认后选择命名方式
    BatchMode,
}

impl Keyboard {
    /// 每行一个按钮
    pub fn rows(&self) -> Vec<Vec<MenuAction>> {
        match self {
            Keyboard::MainMenu => vec![
                vec![MenuAction::Single],
                vec![MenuAction::Batch],
                vec![MenuAction::Inbox],
                vec![MenuAction::SetDomain],
                vec![MenuAction::Info],
            ],
            Keyboard::BatchMode => vec![vec![MenuAction::BatchRandom], vec![MenuAction::BatchCustom]],
        }
    }
}

/// 一条回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
    /// 以弹窗形式提示（仅对按钮回调有意义）
    pub alert: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            alert: false,
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            alert: true,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_main_menu(self) -> Self {
        self.with_keyboard(Keyboard::MainMenu)
    }
}

/// 旧版 Markdown 的实体标记字符
const MARKDOWN_SPECIALS: [char; 4] = ['_', '*', '`', '['];

/// 转义实体之外的文本：在下划线、星号、反引号、左方括号前加反斜杠
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIALS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// 代码实体；代码内无法转义反引号，含反引号时退化为转义后的普通文本
fn code(text: &str) -> String {
    if text.contains('`') {
        escape_markdown(text)
    } else {
        format!("`{text}`")
    }
}

/// 加粗实体；实体内不能嵌套标记字符，含有时退化为转义后的普通文本
fn bold(text: &str) -> String {
    if text.contains(&MARKDOWN_SPECIALS[..]) {
        escape_markdown(text)
    } else {
        format!("*{text}*")
    }
}

pub(crate) fn welcome(first_name: &str, brand: &str, domain: &str, inbox_host: &str) -> Reply {
    let first_name = escape_markdown(first_name);
    let brand = bold(brand);
    let domain = code(domain);
    let inbox_host = escape_markdown(inbox_host);
    Reply::text(format!(
        "Yo {first_name}! 👋\n\n\
         This is the temp email generator bot by {brand}.\n\n\
         ✨ Features:\n\
         • Generate 1 email fast\n\
         • Batch generate many emails (random / custom names)\n\
         • Per-user domain\n\
         • Check inbox via {inbox_host} (direct link)\n\n\
         🌐 Your active domain: {domain}\n\n\
         Pick a menu below 👇"
    ))
    .with_main_menu()
}

pub(crate) fn single_created(email: &str, inbox_host: &str, inbox_link: &str) -> Reply {
    let email = code(email);
    let inbox_host = escape_markdown(inbox_host);
    let inbox_link = escape_markdown(inbox_link);
    Reply::text(format!(
        "✅ *New email created!*\n\n\
         {email}\n\n\
         This is now your *active email*.\n\
         Use it for any sign-up or verification.\n\n\
         📥 Inbox via {inbox_host}:\n\
         {inbox_link}\n\n\
         _Open the link above in a browser to read incoming mail._"
    ))
    .with_main_menu()
}

pub(crate) fn batch_count_prompt(domain: &str) -> Reply {
    let domain = code(domain);
    Reply::text(format!(
        "📦 *Batch Generator*\n\n\
         Active domain: {domain}\n\n\
         How many emails do you want to generate?\n\
         _Send a number between 1 - {MAX_BATCH_COUNT}._"
    ))
}

pub(crate) fn count_accepted(count: u32) -> Reply {
    Reply::text(format!(
        "OK, generating `{count}` email(s).\n\nNow choose the naming mode:"
    ))
    .with_keyboard(Keyboard::BatchMode)
}

pub(crate) fn custom_names_prompt(count: u32) -> Reply {
    Reply::text(format!(
        "✏️ Send the list of local-part names for the emails.\n\
         Separate them with commas or new lines.\n\n\
         Example:\n\
         `akun1, akun2, akun3`\n\n\
         At most `{count}` name(s) will be used, matching the count you entered."
    ))
}

pub(crate) fn batch_created(
    batch: &BatchOutcome,
    current_email: Option<&str>,
    inbox_host: &str,
    inbox_link: Option<&str>,
) -> Reply {
    let mut lines = vec![
        "✅ *Batch emails created!*\n".to_string(),
        format!("Domain: {}", code(&batch.domain)),
        format!("Total: `{}` email(s)\n", batch.emails.len()),
        "Email list:".to_string(),
    ];
    lines.extend(
        batch
            .emails
            .iter()
            .enumerate()
            .map(|(i, email)| format!("{}. {}", i + 1, code(email))),
    );
    lines.push(format!(
        "\nYour active email is now:\n{}",
        code(current_email.unwrap_or("-"))
    ));
    if let Some(link) = inbox_link {
        lines.push(format!(
            "\n📥 Inbox {}:\n{}",
            escape_markdown(inbox_host),
            escape_markdown(link)
        ));
    }
    Reply::text(lines.join("\n")).with_main_menu()
}

pub(crate) fn inbox(email: &str, inbox_host: &str, inbox_link: &str) -> Reply {
    let email = code(email);
    let inbox_host = escape_markdown(inbox_host);
    let inbox_link = escape_markdown(inbox_link);
    Reply::text(format!(
        "📥 *Active Email Inbox*\n\n\
         Email: {email}\n\n\
         Open the inbox on {inbox_host} with this link:\n\
         {inbox_link}\n\n\
         ➕ Tips:\n\
         • Open the link in a phone or desktop browser\n\
         • Need another address? Generate a new one from the menu."
    ))
    .with_main_menu()
}

pub(crate) fn no_active_email() -> Reply {
    Reply::text(
        "❌ You don't have an active email yet.\n\n\
         Generate one first with *📧 Generate 1 Email* or *📦 Batch Email*.",
    )
    .with_main_menu()
}

pub(crate) fn set_domain_prompt(domain: &str, inbox_host: &str) -> Reply {
    let domain = code(domain);
    let inbox_host = escape_markdown(inbox_host);
    Reply::text(format!(
        "⚙️ *Set Email Domain*\n\n\
         Your current domain: {domain}\n\n\
         Reply with the new domain.\n\
         Example:\n\
         `buybm.one`\n\
         `mail.example.com` (if the domain is registered on {inbox_host})"
    ))
}

pub(crate) fn domain_changed(domain: &str) -> Reply {
    Reply::text(format!("✅ Domain changed to: {}", code(domain))).with_main_menu()
}

pub(crate) fn info(info: &SessionInfo, brand: &str) -> Reply {
    let email = code(info.current_email.as_deref().unwrap_or("- none yet -"));
    let brand = bold(brand);
    Reply::text(format!(
        "ℹ️ *Your Account Info*\n\n\
         ID: {}\n\
         Name: {}\n\n\
         👑 Bot brand: {brand}\n\
         🌐 Active domain: {}\n\
         📧 Active email: {email}\n\n\
         📊 *Statistics:*\n\
         • Single emails created: `{}`\n\
         • Batch emails created: `{}` (total items)\n\
         • Last batch size: `{}`\n\
         • Session started: `{}`\n",
        code(&info.user_id),
        escape_markdown(&info.display_name),
        code(&info.domain),
        info.stats.single_generated,
        info.stats.batch_generated,
        info.last_batch_len,
        info.created_at.format("%Y-%m-%d %H:%M UTC"),
    ))
    .with_main_menu()
}

pub(crate) fn validation_failed(err: &ValidationError) -> Reply {
    let text = match err {
        ValidationError::InvalidDomain(_) => {
            "❌ Invalid domain format. Try again, e.g. `buybm.one`".to_string()
        }
        ValidationError::CountNotNumeric(_) => {
            "❌ Please send a number only.\nExample: `5`".to_string()
        }
        ValidationError::CountOutOfRange { max, .. } => {
            format!("❌ The batch limit is 1 - {max} emails.\nPlease send the number again.")
        }
        ValidationError::EmptyNameList => {
            "❌ The name list is empty.\nSend it again, separated by commas or new lines."
                .to_string()
        }
    };
    Reply::text(text)
}

pub(crate) fn precondition_failed(err: &PreconditionError) -> Reply {
    let text = match err {
        PreconditionError::MissingCount => {
            "❌ No batch in progress. Please restart the batch flow from the menu."
        }
        PreconditionError::MissingNames => {
            "❌ The custom name list is empty. Please restart the batch flow from the menu."
        }
    };
    Reply::text(text).with_main_menu()
}

pub(crate) fn unrecognized() -> Reply {
    Reply::text("I didn't quite catch that 😅\nPlease use the menu below.").with_main_menu()
}

pub(crate) fn unknown_callback() -> Reply {
    Reply::alert("Unknown command.")
}
