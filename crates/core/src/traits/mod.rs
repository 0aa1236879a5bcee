pub mod chat;
pub mod tracker;

pub use chat::ChatPlatform;
pub use tracker::IssueTracker;
