//! 批量生成：消费草稿中的数量与命名方式，产出地址列表并更新会话统计

use crate::core::PreconditionError;
use crate::mail::{build_email, random_local_part, sanitize_or_random, RANDOM_LOCAL_LEN};

use super::model::{BatchDraft, NamingMode, Session};

/// 一次批量的结果（供展示）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// 按生成顺序
    pub emails: Vec<String>,
    pub domain: String,
}

/// 按草稿执行批量生成
///
/// 草稿缺少数量、或自定义模式缺少名单时返回 PreconditionError，且不修改会话。
/// 自定义名单多于数量时截断，少于数量时只生成名单条数（不补齐）。
pub fn run_batch(session: &mut Session, mode: NamingMode) -> Result<BatchOutcome, PreconditionError> {
    let draft = &session.batch_draft;
    let count = draft.count.ok_or(PreconditionError::MissingCount)? as usize;
    let domain = draft
        .domain
        .clone()
        .unwrap_or_else(|| session.domain.clone());

    let emails: Vec<String> = match mode {
        NamingMode::Custom => {
            let names = draft
                .names
                .as_deref()
                .filter(|n| !n.is_empty())
                .ok_or(PreconditionError::MissingNames)?;
            names
                .iter()
                .take(count)
                .map(|name| build_email(&sanitize_or_random(name), &domain))
                .collect()
        }
        NamingMode::Random => (0..count)
            .map(|_| build_email(&random_local_part(RANDOM_LOCAL_LEN), &domain))
            .collect(),
    };

    if let Some(first) = emails.first() {
        session.current_email = Some(first.clone());
    }
    session.stats.batch_generated += emails.len() as u64;
    session.last_batch = emails.clone();
    session.batch_draft = BatchDraft::default();

    tracing::info!(
        user_id = %session.user_id,
        count = emails.len(),
        domain = %domain,
        mode = ?mode,
        "Batch generated"
    );

    Ok(BatchOutcome { emails, domain })
}
