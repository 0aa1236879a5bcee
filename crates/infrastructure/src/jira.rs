//! 基于 Jira REST API v2 的工单系统客户端

use async_trait::async_trait;
use handover_core::{HandoverError, HandoverResult, HandoverTicket, Issue, IssueTracker, TrackerConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

/// 搜索时请求的字段
pub const SEARCH_FIELDS: &str = "summary,priority,created,updated,duedate,parent";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

pub struct JiraClient {
    base_url: String,
    user: String,
    token: String,
    max_results: u32,
    http_client: reqwest::Client,
}

impl JiraClient {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            token: config.token.clone(),
            max_results: config.max_results,
            http_client: reqwest::Client::new(),
        }
    }

    /// 工单在浏览器中的链接
    pub fn permalink(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.base_url)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/2/{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> HandoverResult<reqwest::Response> {
        let response = request
            .basic_auth(&self.user, Some(&self.token))
            .send()
            .await
            .map_err(|e| {
                error!("工单系统{}请求失败: {}", action, e);
                HandoverError::Tracker(format!("{action} connection error: {e}"))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("工单系统{}失败: HTTP {} - {}", action, status, body);
        Err(HandoverError::Tracker(format!(
            "{action} failed: HTTP {status} - {body}"
        )))
    }
}

/// 建单请求体
pub fn create_payload(project: &str, title: &str, body: &str, issue_type: &str) -> Value {
    json!({
        "fields": {
            "project": { "key": project },
            "summary": title,
            "description": body,
            "issuetype": { "name": issue_type },
        }
    })
}

pub fn update_payload(body: &str) -> Value {
    json!({ "fields": { "description": body } })
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn search(&self, query: &str) -> HandoverResult<Vec<Issue>> {
        let max_results = self.max_results.to_string();
        let request = self.http_client.get(self.api_url("search")).query(&[
            ("jql", query),
            ("maxResults", max_results.as_str()),
            ("fields", SEARCH_FIELDS),
        ]);

        let response = self.send(request, "search").await?;
        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| HandoverError::Tracker(format!("invalid search response: {e}")))?;

        debug!("搜索返回 {} 个工单", parsed.issues.len());
        Ok(parsed
            .issues
            .into_iter()
            .map(|mut issue| {
                issue.permalink = self.permalink(&issue.key);
                issue
            })
            .collect())
    }

    async fn create(
        &self,
        project: &str,
        title: &str,
        body: &str,
        issue_type: &str,
    ) -> HandoverResult<HandoverTicket> {
        let request = self
            .http_client
            .post(self.api_url("issue"))
            .json(&create_payload(project, title, body, issue_type));

        let response = self.send(request, "create").await?;
        let created: CreatedIssue = response
            .json()
            .await
            .map_err(|e| HandoverError::Tracker(format!("invalid create response: {e}")))?;

        info!("工单已创建: {}", created.key);
        Ok(HandoverTicket {
            permalink: self.permalink(&created.key),
            key: created.key,
            summary: title.to_string(),
        })
    }

    async fn update(&self, ticket: &HandoverTicket, body: &str) -> HandoverResult<()> {
        let request = self
            .http_client
            .put(self.api_url(&format!("issue/{}", ticket.key)))
            .json(&update_payload(body));

        self.send(request, "update").await?;
        info!("工单描述已更新: {}", ticket.key);
        Ok(())
    }
}
