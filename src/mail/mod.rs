//! 邮箱地址：本地部分生成与清洗、收件箱链接

pub mod generator;
pub mod inbox;

pub use generator::{
    build_email, random_local_part, sanitize_name, sanitize_or_random, FALLBACK_LOCAL_LEN,
    RANDOM_LOCAL_LEN,
};
pub use inbox::{build_inbox_link, InboxLinkBuilder};
