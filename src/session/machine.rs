//! 会话状态机：根据 pending 状态解释用户的自由文本
//!
//! 状态转换：
//! - None → AwaitingDomain（设置域名）→ None（收到合法域名）
//! - None → AwaitingBatchCount（开始批量）→ None（收到 1..=50 的数字），随后选择命名方式
//! - 选择 Random：立即批量生成；选择 Custom：→ AwaitingCustomNames → None（收到名单并立即生成）
//!
//! 校验失败时保持原状态，不修改会话。

use crate::core::{PreconditionError, ValidationError};
use crate::mail::{build_email, random_local_part, RANDOM_LOCAL_LEN};

use super::batch::{run_batch, BatchOutcome};
use super::model::{BatchDraft, NamingMode, PendingInput, Session};

pub const MIN_DOMAIN_LEN: usize = 3;
pub const MAX_BATCH_COUNT: u32 = 50;

/// 一条自由文本的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    DomainChanged { domain: String },
    /// 数量已记录，接下来等待选择命名方式
    CountAccepted { count: u32 },
    /// 自定义名单已接收并立即执行了批量
    Batch(Result<BatchOutcome, PreconditionError>),
    /// 输入不合法，保持当前等待状态
    Rejected(ValidationError),
    /// 没有进行中的流程
    Unrecognized,
}

/// 选择命名方式后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingOutcome {
    Generated(BatchOutcome),
    AwaitingNames { count: u32 },
}

/// 校验域名：去首尾空白后不得含空白或 `@`，且至少 3 个字符；返回去空白后的域名
pub fn validate_domain(text: &str) -> Result<String, ValidationError> {
    let domain = text.trim();
    if domain.chars().any(|c| c.is_whitespace() || c == '@')
        || domain.chars().count() < MIN_DOMAIN_LEN
    {
        return Err(ValidationError::InvalidDomain(domain.to_string()));
    }
    Ok(domain.to_string())
}

/// 解析批量数量：只能由十进制数字组成，且在 1..=MAX_BATCH_COUNT 之内
pub fn parse_batch_count(text: &str) -> Result<u32, ValidationError> {
    let digits = text.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::CountNotNumeric(digits.to_string()));
    }
    let out_of_range = || ValidationError::CountOutOfRange {
        value: digits.to_string(),
        max: MAX_BATCH_COUNT,
    };
    // 超出 u32 的数字串同样视为越界
    let count: u32 = digits.parse().map_err(|_| out_of_range())?;
    if !(1..=MAX_BATCH_COUNT).contains(&count) {
        return Err(out_of_range());
    }
    Ok(count)
}

/// 解析自定义名单：按行、再按逗号切分，去空白并丢弃空项，保持顺序
pub fn parse_custom_names(text: &str) -> Result<Vec<String>, ValidationError> {
    let names: Vec<String> = text
        .lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();
    if names.is_empty() {
        return Err(ValidationError::EmptyNameList);
    }
    Ok(names)
}

impl Session {
    /// 单个生成：用当前域名生成随机地址并设为当前邮箱，不影响 pending 状态
    pub fn generate_single(&mut self) -> String {
        let email = build_email(&random_local_part(RANDOM_LOCAL_LEN), &self.domain);
        self.current_email = Some(email.clone());
        self.stats.single_generated += 1;
        tracing::info!(user_id = %self.user_id, email = %email, "Single email generated");
        email
    }

    pub fn begin_set_domain(&mut self) {
        self.transition(PendingInput::AwaitingDomain);
    }

    pub fn begin_batch(&mut self) {
        self.batch_draft = BatchDraft::for_domain(self.domain.clone());
        self.transition(PendingInput::AwaitingBatchCount);
    }

    /// 数量确认后选择命名方式；草稿中没有数量时返回 MissingCount 且不修改会话
    pub fn choose_naming_mode(&mut self, mode: NamingMode) -> Result<NamingOutcome, PreconditionError> {
        match mode {
            NamingMode::Random => run_batch(self, NamingMode::Random).map(NamingOutcome::Generated),
            NamingMode::Custom => {
                let count = self.batch_draft.count.ok_or(PreconditionError::MissingCount)?;
                self.transition(PendingInput::AwaitingCustomNames);
                Ok(NamingOutcome::AwaitingNames { count })
            }
        }
    }

    /// 按当前 pending 状态解释一条自由文本
    pub fn handle_text(&mut self, text: &str) -> TextOutcome {
        match self.pending {
            PendingInput::None => TextOutcome::Unrecognized,
            PendingInput::AwaitingDomain => match validate_domain(text) {
                Ok(domain) => {
                    tracing::info!(user_id = %self.user_id, domain = %domain, "Domain changed");
                    self.domain = domain.clone();
                    self.transition(PendingInput::None);
                    TextOutcome::DomainChanged { domain }
                }
                Err(e) => self.reject(e),
            },
            PendingInput::AwaitingBatchCount => match parse_batch_count(text) {
                Ok(count) => {
                    self.batch_draft.count = Some(count);
                    self.transition(PendingInput::None);
                    TextOutcome::CountAccepted { count }
                }
                Err(e) => self.reject(e),
            },
            PendingInput::AwaitingCustomNames => match parse_custom_names(text) {
                Ok(names) => {
                    self.batch_draft.names = Some(names);
                    self.transition(PendingInput::None);
                    TextOutcome::Batch(run_batch(self, NamingMode::Custom))
                }
                Err(e) => self.reject(e),
            },
        }
    }

    fn transition(&mut self, next: PendingInput) {
        tracing::debug!(user_id = %self.user_id, from = ?self.pending, to = ?next, "Pending input transition");
        self.pending = next;
    }

    fn reject(&self, err: ValidationError) -> TextOutcome {
        tracing::debug!(user_id = %self.user_id, pending = ?self.pending, "Rejected input: {}", err);
        TextOutcome::Rejected(err)
    }
}
