pub mod blocks;
pub mod channel;
pub mod issue;
pub mod job;
pub mod ticket;

pub use blocks::{Accessory, Block, ModalView, TextObject};
pub use channel::{Channel, ChannelPage, ChannelTopic};
pub use issue::{Issue, IssueFields, IssueParent, IssuePriority};
pub use job::JobKind;
pub use ticket::HandoverTicket;
