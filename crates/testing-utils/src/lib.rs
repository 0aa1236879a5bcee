//! # Handover Testing Utils
//!
//! 工作区内共享的测试工具：工单系统与聊天平台的内存模拟实现，以及测试数据构建器。
//!
//! ## Usage
//!
//! ```toml
//! [dev-dependencies]
//! handover-testing-utils = { path = "../testing-utils" }
//! ```
//!
//! ```rust
//! use handover_testing_utils::{ChannelBuilder, IssueBuilder, MockChatPlatform, MockIssueTracker};
//! ```

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
