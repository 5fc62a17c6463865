//! 用户会话：数据模型、状态机、批量生成与内存存储

pub mod batch;
pub mod machine;
pub mod model;
pub mod store;

pub use batch::{run_batch, BatchOutcome};
pub use machine::{
    parse_batch_count, parse_custom_names, validate_domain, NamingOutcome, TextOutcome,
    MAX_BATCH_COUNT, MIN_DOMAIN_LEN,
};
pub use model::{
    BatchDraft, NamingMode, PendingInput, Session, SessionInfo, Stats, UserIdentity,
};
pub use store::{SessionStore, SharedSession};
