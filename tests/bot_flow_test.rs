//! 端到端流程测试：通过 MailBot 公共 API 驱动完整会话

use mailgen::bot::{Command, Event, Keyboard, MailBot, MenuAction};
use mailgen::mail::InboxLinkBuilder;
use mailgen::session::{PendingInput, SessionStore, UserIdentity};

fn bot() -> MailBot {
    MailBot::new(
        SessionStore::new("buybm.one"),
        InboxLinkBuilder::new("https://generator.email"),
        "VanzShop.id",
    )
}

fn user(id: &str) -> UserIdentity {
    UserIdentity::new(id, "Tester")
}

async fn send_text(bot: &MailBot, user: &UserIdentity, text: &str) -> mailgen::Reply {
    bot.handle(user, Event::Text(text.to_string())).await
}

#[tokio::test]
async fn test_set_domain_flow() {
    let bot = bot();
    let u = user("1");

    bot.handle(&u, Event::Command(Command::Domain)).await;
    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert_eq!(s.pending, PendingInput::AwaitingDomain);

    for bad in ["ab", "has space", "a@b"] {
        send_text(&bot, &u, bad).await;
        let s = bot.store().snapshot(&u.id).await.unwrap();
        assert_eq!(s.pending, PendingInput::AwaitingDomain, "{bad} should be rejected");
        assert_eq!(s.domain, "buybm.one");
    }

    let reply = send_text(&bot, &u, "mail.test").await;
    assert!(reply.text.contains("mail.test"));
    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert_eq!(s.pending, PendingInput::None);
    assert_eq!(s.domain, "mail.test");
}

#[tokio::test]
async fn test_random_batch_flow() {
    let bot = bot();
    let u = user("2");

    bot.handle(&u, Event::Menu(MenuAction::Batch)).await;
    for bad in ["0", "51", "abc"] {
        let reply = send_text(&bot, &u, bad).await;
        assert!(reply.text.starts_with('❌'), "{bad} should be rejected");
        let s = bot.store().snapshot(&u.id).await.unwrap();
        assert_eq!(s.pending, PendingInput::AwaitingBatchCount);
    }

    let reply = send_text(&bot, &u, "3").await;
    assert_eq!(reply.keyboard, Some(Keyboard::BatchMode));

    let reply = bot.handle(&u, Event::Menu(MenuAction::BatchRandom)).await;
    assert!(reply.text.contains("Total: `3`"));

    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert_eq!(s.last_batch.len(), 3);
    assert!(s.last_batch.iter().all(|e| e.ends_with("@buybm.one")));
    assert_eq!(s.stats.batch_generated, 3);
    assert_eq!(s.current_email.as_ref(), s.last_batch.first());
    assert_eq!(s.pending, PendingInput::None);
}

#[tokio::test]
async fn test_batch_uses_domain_at_draft_time() {
    let bot = bot();
    let u = user("3");

    bot.on_batch_start(&u).await;
    send_text(&bot, &u, "2").await;

    // 草稿建立后修改域名，不影响本次批量
    bot.on_set_domain_start(&u).await;
    send_text(&bot, &u, "later.test").await;

    bot.handle(&u, Event::Menu(MenuAction::BatchRandom)).await;
    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert!(s.last_batch.iter().all(|e| e.ends_with("@buybm.one")));
    assert_eq!(s.domain, "later.test");
}

#[tokio::test]
async fn test_custom_batch_flow() {
    let bot = bot();
    let u = user("4");

    bot.on_batch_start(&u).await;
    send_text(&bot, &u, "2").await;
    bot.handle(&u, Event::Menu(MenuAction::BatchCustom)).await;
    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert_eq!(s.pending, PendingInput::AwaitingCustomNames);

    let reply = send_text(&bot, &u, " , ").await;
    assert!(reply.text.contains("empty"));

    let reply = send_text(&bot, &u, "x!!, y\nzed").await;
    assert!(reply.text.contains("1. `x@buybm.one`"));
    assert!(reply.text.contains("2. `y@buybm.one`"));
    assert!(!reply.text.contains("zed@"));

    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert_eq!(s.last_batch, vec!["x@buybm.one", "y@buybm.one"]);
    assert_eq!(s.current_email.as_deref(), Some("x@buybm.one"));
    assert_eq!(s.stats.batch_generated, 2);
    assert_eq!(s.pending, PendingInput::None);

    let (email, link) = bot.inbox_link(&u).await.unwrap();
    assert_eq!(email, "x@buybm.one");
    assert_eq!(link, "https://generator.email/x@buybm.one");
}

#[tokio::test]
async fn test_custom_names_fewer_than_count() {
    let bot = bot();
    let u = user("5");

    bot.on_batch_start(&u).await;
    send_text(&bot, &u, "5").await;
    bot.handle(&u, Event::Menu(MenuAction::BatchCustom)).await;
    send_text(&bot, &u, "alice, bob\ncarol").await;

    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert_eq!(
        s.last_batch,
        vec!["alice@buybm.one", "bob@buybm.one", "carol@buybm.one"]
    );
}

#[tokio::test]
async fn test_stale_naming_button_after_batch() {
    let bot = bot();
    let u = user("6");

    bot.on_batch_start(&u).await;
    send_text(&bot, &u, "1").await;
    bot.handle(&u, Event::Menu(MenuAction::BatchRandom)).await;

    // 同一键盘再次点击：草稿已重置
    let reply = bot.handle(&u, Event::Menu(MenuAction::BatchRandom)).await;
    assert!(reply.text.contains("restart the batch flow"));
    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert_eq!(s.stats.batch_generated, 1);
}

#[tokio::test]
async fn test_sessions_are_per_user() {
    let bot = bot();
    let a = user("a");
    let b = user("b");

    bot.on_set_domain_start(&a).await;
    let reply = send_text(&bot, &b, "mail.test").await;
    assert!(reply.text.contains("didn't quite catch"));

    send_text(&bot, &a, "mail.test").await;
    assert_eq!(bot.info(&a).await.domain, "mail.test");
    assert_eq!(bot.info(&b).await.domain, "buybm.one");
    assert_eq!(bot.store().active_count().await, 2);
}

/// 旧版 Markdown：实体必须闭合，实体外的标记字符必须用反斜杠转义
fn parses_as_legacy_markdown(text: &str) -> bool {
    let specials = ['_', '*', '`', '['];
    let mut open: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match open {
            None => match c {
                '\\' if chars.peek().is_some_and(|n| specials.contains(n)) => {
                    chars.next();
                }
                '_' | '*' | '`' => open = Some(c),
                '[' => return false,
                _ => {}
            },
            Some(marker) if c == marker => open = None,
            Some(_) => {}
        }
    }
    open.is_none()
}

#[tokio::test]
async fn test_underscores_in_name_domain_and_link() {
    let bot = bot();
    let u = UserIdentity::new("7", "john_doe").with_last_name("o_neil");
    let mut replies = Vec::new();

    let welcome = bot.handle(&u, Event::Command(Command::Start)).await;
    assert!(welcome.text.starts_with("Yo john\\_doe!"));
    replies.push(welcome);

    replies.push(bot.handle(&u, Event::Command(Command::Domain)).await);
    replies.push(send_text(&bot, &u, "mail_x.test").await);
    replies.push(bot.handle(&u, Event::Command(Command::Batch)).await);
    replies.push(send_text(&bot, &u, "1").await);
    replies.push(bot.handle(&u, Event::Menu(MenuAction::BatchCustom)).await);

    let batch = send_text(&bot, &u, "john_doe").await;
    assert!(batch.text.contains("1. `john_doe@mail_x.test`"));
    assert!(batch
        .text
        .contains("https://generator.email/john\\_doe@mail\\_x.test"));
    replies.push(batch);

    replies.push(bot.handle(&u, Event::Command(Command::Inbox)).await);
    replies.push(bot.handle(&u, Event::Command(Command::Info)).await);
    replies.push(bot.handle(&u, Event::Command(Command::Single)).await);

    for reply in &replies {
        assert!(parses_as_legacy_markdown(&reply.text), "unbalanced Markdown:\n{}", reply.text);
    }

    let s = bot.store().snapshot(&u.id).await.unwrap();
    assert_eq!(s.last_batch, vec!["john_doe@mail_x.test"]);
}
