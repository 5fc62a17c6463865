//! 会话数据模型：每个用户一份，进程内存中保存

use chrono::{DateTime, Utc};

/// 平台提供的用户身份（只读）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// 平台侧稳定的不透明 ID（Telegram 为数字 user id）
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: None,
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// 完整显示名：first_name + 可选 last_name
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().filter(|l| !l.is_empty()) {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// 等待用户输入的状态：决定下一条自由文本如何解释
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingInput {
    #[default]
    None,
    AwaitingDomain,
    AwaitingBatchCount,
    AwaitingCustomNames,
}

/// 批量生成的命名方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingMode {
    Random,
    Custom,
}

/// 生成计数（只增不减）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub single_generated: u64,
    /// 批量生成的地址总数（按条目计）
    pub batch_generated: u64,
}

/// 进行中的批量参数，开始或完成批量流程时重置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDraft {
    pub domain: Option<String>,
    /// 设置后必在 1..=MAX_BATCH_COUNT 之内
    pub count: Option<u32>,
    pub names: Option<Vec<String>>,
}

impl BatchDraft {
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..Self::default()
        }
    }
}

/// 单个用户的会话
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    /// 新地址使用的域名；只由设置域名流程修改
    pub domain: String,
    /// 最近生成的地址，收件箱查询读取它
    pub current_email: Option<String>,
    pub stats: Stats,
    /// 最近一次批量结果，按生成顺序
    pub last_batch: Vec<String>,
    pub pending: PendingInput,
    pub batch_draft: BatchDraft,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, default_domain: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            domain: default_domain.into(),
            current_email: None,
            stats: Stats::default(),
            last_batch: Vec::new(),
            pending: PendingInput::None,
            batch_draft: BatchDraft::default(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// 只读快照（信息页）
    pub fn info(&self, user: &UserIdentity) -> SessionInfo {
        SessionInfo {
            user_id: self.user_id.clone(),
            display_name: user.display_name(),
            domain: self.domain.clone(),
            current_email: self.current_email.clone(),
            stats: self.stats,
            last_batch_len: self.last_batch.len(),
            created_at: self.created_at,
        }
    }
}

/// 信息页展示的会话快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub user_id: String,
    pub display_name: String,
    pub domain: String,
    pub current_email: Option<String>,
    pub stats: Stats,
    pub last_batch_len: usize,
    pub created_at: DateTime<Utc>,
}
