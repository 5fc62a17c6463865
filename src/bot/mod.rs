//! 请求处理层：把命令 / 按钮 / 自由文本映射到会话操作，并生成回复
//!
//! 每个入口先按 user_id 取得（或创建）会话，在会话锁内完成状态修改，锁外渲染文案。

pub mod event;
pub mod reply;

pub use event::{Command, Event, MenuAction};
pub use reply::{Keyboard, Reply};

use crate::config::AppConfig;
use crate::mail::InboxLinkBuilder;
use crate::session::{NamingMode, NamingOutcome, SessionInfo, SessionStore, TextOutcome, UserIdentity};

/// 邮箱生成机器人：会话存储 + 收件箱链接 + 品牌名，可被多个 Channel 共享
pub struct MailBot {
    store: SessionStore,
    links: InboxLinkBuilder,
    brand: String,
}

impl MailBot {
    pub fn new(store: SessionStore, links: InboxLinkBuilder, brand: impl Into<String>) -> Self {
        Self {
            store,
            links,
            brand: brand.into(),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(
            SessionStore::new(cfg.mail.default_domain.clone()),
            InboxLinkBuilder::new(cfg.mail.inbox_base_url.clone()),
            cfg.app.brand.clone(),
        )
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn links(&self) -> &InboxLinkBuilder {
        &self.links
    }

    /// 事件分发入口
    pub async fn handle(&self, user: &UserIdentity, event: Event) -> Reply {
        tracing::debug!(user_id = %user.id, event = ?event, "Handling event");
        match event {
            Event::Command(cmd) => match cmd {
                Command::Start | Command::Menu => self.on_start(user).await,
                Command::Single => self.on_single_generate(user).await,
                Command::Batch => self.on_batch_start(user).await,
                Command::Inbox => self.on_inbox(user).await,
                Command::Domain => self.on_set_domain_start(user).await,
                Command::Info => self.on_info(user).await,
            },
            Event::Menu(action) => match action {
                MenuAction::Single => self.on_single_generate(user).await,
                MenuAction::Batch => self.on_batch_start(user).await,
                MenuAction::Inbox => self.on_inbox(user).await,
                MenuAction::SetDomain => self.on_set_domain_start(user).await,
                MenuAction::Info => self.on_info(user).await,
                MenuAction::BatchRandom => self.on_naming_mode(user, NamingMode::Random).await,
                MenuAction::BatchCustom => self.on_naming_mode(user, NamingMode::Custom).await,
            },
            Event::UnknownCallback(data) => {
                tracing::warn!(user_id = %user.id, "Unknown callback data: {}", data);
                // 仍然创建会话，与其它入口保持一致
                self.store.get_or_create(&user.id).await;
                reply::unknown_callback()
            }
            Event::Text(text) => self.on_text(user, &text).await,
        }
    }

    pub async fn on_start(&self, user: &UserIdentity) -> Reply {
        let domain = self.store.with_session(&user.id, |s| s.domain.clone()).await;
        reply::welcome(&user.first_name, &self.brand, &domain, self.links.host())
    }

    pub async fn on_single_generate(&self, user: &UserIdentity) -> Reply {
        let email = self.store.with_session(&user.id, |s| s.generate_single()).await;
        reply::single_created(&email, self.links.host(), &self.links.build(&email))
    }

    pub async fn on_batch_start(&self, user: &UserIdentity) -> Reply {
        let domain = self
            .store
            .with_session(&user.id, |s| {
                s.begin_batch();
                s.domain.clone()
            })
            .await;
        reply::batch_count_prompt(&domain)
    }

    /// 当前邮箱的收件箱链接；没有当前邮箱时为 None
    pub async fn inbox_link(&self, user: &UserIdentity) -> Option<(String, String)> {
        let email = self
            .store
            .with_session(&user.id, |s| s.current_email.clone())
            .await?;
        let link = self.links.build(&email);
        Some((email, link))
    }

    pub async fn on_inbox(&self, user: &UserIdentity) -> Reply {
        match self.inbox_link(user).await {
            Some((email, link)) => reply::inbox(&email, self.links.host(), &link),
            None => reply::no_active_email(),
        }
    }

    pub async fn on_set_domain_start(&self, user: &UserIdentity) -> Reply {
        let domain = self
            .store
            .with_session(&user.id, |s| {
                s.begin_set_domain();
                s.domain.clone()
            })
            .await;
        reply::set_domain_prompt(&domain, self.links.host())
    }

    /// 只读快照：域名、当前邮箱、统计
    pub async fn info(&self, user: &UserIdentity) -> SessionInfo {
        self.store.with_session(&user.id, |s| s.info(user)).await
    }

    pub async fn on_info(&self, user: &UserIdentity) -> Reply {
        let info = self.info(user).await;
        reply::info(&info, &self.brand)
    }

    pub async fn on_naming_mode(&self, user: &UserIdentity, mode: NamingMode) -> Reply {
        let (outcome, current_email) = self
            .store
            .with_session(&user.id, |s| {
                let outcome = s.choose_naming_mode(mode);
                (outcome, s.current_email.clone())
            })
            .await;
        match outcome {
            Ok(NamingOutcome::Generated(batch)) => self.render_batch(&batch, current_email.as_deref()),
            Ok(NamingOutcome::AwaitingNames { count }) => reply::custom_names_prompt(count),
            Err(e) => {
                tracing::warn!(user_id = %user.id, "Naming mode rejected: {}", e);
                reply::precondition_failed(&e)
            }
        }
    }

    pub async fn on_text(&self, user: &UserIdentity, text: &str) -> Reply {
        let (outcome, current_email) = self
            .store
            .with_session(&user.id, |s| {
                let outcome = s.handle_text(text);
                (outcome, s.current_email.clone())
            })
            .await;
        match outcome {
            TextOutcome::DomainChanged { domain } => reply::domain_changed(&domain),
            TextOutcome::CountAccepted { count } => reply::count_accepted(count),
            TextOutcome::Batch(Ok(batch)) => self.render_batch(&batch, current_email.as_deref()),
            TextOutcome::Batch(Err(e)) => {
                tracing::warn!(user_id = %user.id, "Custom batch failed: {}", e);
                reply::precondition_failed(&e)
            }
            TextOutcome::Rejected(e) => reply::validation_failed(&e),
            TextOutcome::Unrecognized => reply::unrecognized(),
        }
    }

    fn render_batch(&self, batch: &crate::session::BatchOutcome, current_email: Option<&str>) -> Reply {
        let link = current_email.map(|email| self.links.build(email));
        reply::batch_created(batch, current_email, self.links.host(), link.as_deref())
    }
}
