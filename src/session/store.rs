//! 会话存储：user_id -> Session，进程内存，不持久化
//!
//! 外层 RwLock 只保护映射本身，每个会话有独立的 Mutex，不同用户之间互不阻塞。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::model::Session;

/// 单个会话的共享句柄
pub type SharedSession = Arc<Mutex<Session>>;

/// 按用户隔离的内存会话存储
pub struct SessionStore {
    /// 新会话的默认域名
    default_domain: String,
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl SessionStore {
    pub fn new(default_domain: impl Into<String>) -> Self {
        Self {
            default_domain: default_domain.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    /// 获取或创建用户的会话
    pub async fn get_or_create(&self, user_id: &str) -> SharedSession {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(user_id) {
                return Arc::clone(session);
            }
        }

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(user_id) {
            return Arc::clone(session);
        }

        let session = Arc::new(Mutex::new(Session::new(user_id, self.default_domain.clone())));
        sessions.insert(user_id.to_string(), Arc::clone(&session));
        tracing::info!(user_id = %user_id, total = sessions.len(), "Session created");
        session
    }

    /// 独占访问某个用户的会话（不存在则创建），并刷新活跃时间
    pub async fn with_session<F, R>(&self, user_id: &str, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let session = self.get_or_create(user_id).await;
        let mut guard = session.lock().await;
        guard.touch();
        f(&mut *guard)
    }

    /// 会话快照（不创建）
    pub async fn snapshot(&self, user_id: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(user_id).cloned()?;
        let guard = session.lock().await;
        Some(guard.clone())
    }

    /// 获取活跃会话数
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
