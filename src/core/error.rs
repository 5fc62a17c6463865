//! 错误类型
//!
//! ValidationError：用户输入不合法，保持当前等待状态，提示用户重试；
//! PreconditionError：批量生成缺少前置数据（数量/名单），要求用户重新开始批量流程。

use thiserror::Error;

/// 用户输入校验失败（可恢复，会话状态不推进）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid domain format: {0:?}")]
    InvalidDomain(String),

    #[error("Batch count is not a number: {0:?}")]
    CountNotNumeric(String),

    #[error("Batch count out of range 1-{max}: {value}")]
    CountOutOfRange { value: String, max: u32 },

    #[error("Custom name list is empty")]
    EmptyNameList,
}

/// 批量生成的前置条件不满足（状态机正常运转时不会出现）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Batch count has not been set")]
    MissingCount,

    #[error("No custom names in batch draft")]
    MissingNames,
}

/// 启动配置错误
#[derive(Error, Debug)]
pub enum MailError {
    /// mail.default_domain 不满足 /domain 的校验规则
    #[error("Invalid mail.default_domain: {0}")]
    DefaultDomain(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(String),
}
