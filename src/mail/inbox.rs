//! 收件箱查看链接：`<base>/<编码后的邮箱>`
//!
//! 只负责拼 URL，不访问网络。

/// 按固定 base URL 构造收件箱链接
#[derive(Debug, Clone)]
pub struct InboxLinkBuilder {
    base_url: String,
}

impl InboxLinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 展示用主机名，如 `generator.email`
    pub fn host(&self) -> &str {
        let without_scheme = self
            .base_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.base_url);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }

    pub fn build(&self, email: &str) -> String {
        build_inbox_link(&self.base_url, email)
    }
}

/// 百分号编码邮箱（保留 `@` 与 RFC 3986 非保留字符），拼到 base 路径之后
pub fn build_inbox_link(base_url: &str, email: &str) -> String {
    // 原始 '%' 会编码为 %25，因此 %40 只可能来自 '@'
    let encoded = urlencoding::encode(email).replace("%40", "@");
    format!("{}/{}", base_url.trim_end_matches('/'), encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://generator.email";

    #[test]
    fn test_plain_address_keeps_at() {
        let link = build_inbox_link(BASE, "a@b.com");
        assert_eq!(link, "https://generator.email/a@b.com");
        assert!(link.ends_with("a@b.com"));
    }

    #[test]
    fn test_reserved_characters_escaped() {
        let link = build_inbox_link(BASE, "a/b?c#d@x.y");
        assert_eq!(link, "https://generator.email/a%2Fb%3Fc%23d@x.y");

        let link = build_inbox_link(BASE, "a b+c%40@x.y");
        assert_eq!(link, "https://generator.email/a%20b%2Bc%2540@x.y");
    }

    #[test]
    fn test_unreserved_characters_untouched() {
        let link = build_inbox_link(BASE, "john.doe_99-x~@mail.test");
        assert_eq!(link, "https://generator.email/john.doe_99-x~@mail.test");
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let builder = InboxLinkBuilder::new("https://generator.email/");
        assert_eq!(builder.base_url(), BASE);
        assert_eq!(builder.build("a@b.com"), "https://generator.email/a@b.com");
        assert_eq!(builder.host(), "generator.email");
        assert_eq!(InboxLinkBuilder::new("http://inbox.local/view").host(), "inbox.local");
    }
}
