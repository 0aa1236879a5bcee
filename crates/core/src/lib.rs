pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::*;
pub use errors::*;
pub use models::{
    Block, Channel, ChannelPage, ChannelTopic, HandoverTicket, Issue, IssueFields, IssueParent,
    IssuePriority, JobKind, ModalView, TextObject,
};
pub use traits::{ChatPlatform, IssueTracker};

/// 统一的Result类型
pub type HandoverResult<T> = std::result::Result<T, HandoverError>;
