use async_trait::async_trait;

use crate::models::{HandoverTicket, Issue};
use crate::HandoverResult;

/// 工单系统协作方
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// 按查询表达式搜索工单，保持服务端返回的顺序
    async fn search(&self, query: &str) -> HandoverResult<Vec<Issue>>;

    /// 创建工单并返回其引用
    async fn create(
        &self,
        project: &str,
        title: &str,
        body: &str,
        issue_type: &str,
    ) -> HandoverResult<HandoverTicket>;

    /// 覆盖工单描述
    async fn update(&self, ticket: &HandoverTicket, body: &str) -> HandoverResult<()>;
}
