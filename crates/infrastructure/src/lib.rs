//! 外部协作方的 HTTP 客户端实现

pub mod jira;
pub mod slack;

pub use jira::JiraClient;
pub use slack::SlackClient;
