//! 协作方的内存模拟实现
//!
//! 所有调用都会被记录下来，测试可以据此断言调用顺序与参数；
//! 也可以注入失败来验证错误传播。

use async_trait::async_trait;
use handover_core::{
    Block, ChannelPage, ChatPlatform, HandoverError, HandoverResult, HandoverTicket, Issue,
    IssueTracker, ModalView,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const MOCK_TRACKER_BASE: &str = "https://tracker.example.com";

/// 记录下来的建单请求
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTicket {
    pub project: String,
    pub title: String,
    pub body: String,
    pub issue_type: String,
    pub key: String,
}

/// 记录下来的工单更新
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedTicket {
    pub key: String,
    pub body: String,
}

/// Mock implementation of IssueTracker for testing
#[derive(Debug, Clone)]
pub struct MockIssueTracker {
    results: Arc<Mutex<HashMap<String, Vec<Issue>>>>,
    default_results: Arc<Mutex<Vec<Issue>>>,
    searches: Arc<Mutex<Vec<String>>>,
    created: Arc<Mutex<Vec<CreatedTicket>>>,
    updated: Arc<Mutex<Vec<UpdatedTicket>>>,
    next_id: Arc<Mutex<u32>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockIssueTracker {
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(HashMap::new())),
            default_results: Arc::new(Mutex::new(Vec::new())),
            searches: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            updated: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(100)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// 任何未单独配置的查询都返回这些工单
    pub fn with_issues(issues: Vec<Issue>) -> Self {
        let mock = Self::new();
        *mock.default_results.lock().unwrap() = issues;
        mock
    }

    /// 为某条查询配置返回结果
    pub fn set_results(&self, query: &str, issues: Vec<Issue>) {
        self.results
            .lock()
            .unwrap()
            .insert(query.to_string(), issues);
    }

    /// 之后的每次调用都返回错误
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<CreatedTicket> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<UpdatedTicket> {
        self.updated.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.searches.lock().unwrap().len()
            + self.created.lock().unwrap().len()
            + self.updated.lock().unwrap().len()
    }

    fn check_failure(&self) -> HandoverResult<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(HandoverError::Tracker(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockIssueTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IssueTracker for MockIssueTracker {
    async fn search(&self, query: &str) -> HandoverResult<Vec<Issue>> {
        self.searches.lock().unwrap().push(query.to_string());
        self.check_failure()?;

        let results = self.results.lock().unwrap();
        Ok(results
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.default_results.lock().unwrap().clone()))
    }

    async fn create(
        &self,
        project: &str,
        title: &str,
        body: &str,
        issue_type: &str,
    ) -> HandoverResult<HandoverTicket> {
        self.check_failure()?;

        let key = {
            let mut next_id = self.next_id.lock().unwrap();
            let key = format!("{project}-{next_id}");
            *next_id += 1;
            key
        };

        self.created.lock().unwrap().push(CreatedTicket {
            project: project.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            issue_type: issue_type.to_string(),
            key: key.clone(),
        });

        Ok(HandoverTicket {
            permalink: format!("{MOCK_TRACKER_BASE}/browse/{key}"),
            key,
            summary: title.to_string(),
        })
    }

    async fn update(&self, ticket: &HandoverTicket, body: &str) -> HandoverResult<()> {
        self.check_failure()?;
        self.updated.lock().unwrap().push(UpdatedTicket {
            key: ticket.key.clone(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Mock implementation of ChatPlatform for testing
///
/// 频道列表按页返回，第 n 页的游标为 `"page-n"`。
#[derive(Debug, Clone)]
pub struct MockChatPlatform {
    pages: Arc<Mutex<Vec<ChannelPage>>>,
    cursors: Arc<Mutex<Vec<Option<String>>>>,
    posted: Arc<Mutex<Vec<Vec<Block>>>>,
    opened: Arc<Mutex<Vec<(String, ModalView)>>>,
    modal_updates: Arc<Mutex<Vec<(String, ModalView)>>>,
    fail_channels: Arc<Mutex<Option<String>>>,
    fail_post: Arc<Mutex<Option<String>>>,
    fail_modals: Arc<Mutex<Option<String>>>,
}

impl MockChatPlatform {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(Vec::new())),
            cursors: Arc::new(Mutex::new(Vec::new())),
            posted: Arc::new(Mutex::new(Vec::new())),
            opened: Arc::new(Mutex::new(Vec::new())),
            modal_updates: Arc::new(Mutex::new(Vec::new())),
            fail_channels: Arc::new(Mutex::new(None)),
            fail_post: Arc::new(Mutex::new(None)),
            fail_modals: Arc::new(Mutex::new(None)),
        }
    }

    /// 每个元素是一页频道，除最后一页外都带下一页游标
    pub fn with_channel_pages(pages: Vec<Vec<handover_core::Channel>>) -> Self {
        let mock = Self::new();
        let total = pages.len();
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, channels)| ChannelPage {
                channels,
                next_cursor: (i + 1 < total).then(|| format!("page-{}", i + 1)),
            })
            .collect();
        *mock.pages.lock().unwrap() = pages;
        mock
    }

    pub fn fail_channels_with(&self, message: &str) {
        *self.fail_channels.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_post_with(&self, message: &str) {
        *self.fail_post.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_modals_with(&self, message: &str) {
        *self.fail_modals.lock().unwrap() = Some(message.to_string());
    }

    /// 每次翻页请求携带的游标
    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }

    pub fn posted(&self) -> Vec<Vec<Block>> {
        self.posted.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<(String, ModalView)> {
        self.opened.lock().unwrap().clone()
    }

    pub fn modal_updates(&self) -> Vec<(String, ModalView)> {
        self.modal_updates.lock().unwrap().clone()
    }

    fn check(flag: &Mutex<Option<String>>) -> HandoverResult<()> {
        match flag.lock().unwrap().as_ref() {
            Some(message) => Err(HandoverError::Chat(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockChatPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatPlatform for MockChatPlatform {
    async fn list_channels(&self, cursor: Option<&str>) -> HandoverResult<ChannelPage> {
        self.cursors
            .lock()
            .unwrap()
            .push(cursor.map(str::to_string));
        Self::check(&self.fail_channels)?;

        let index = match cursor {
            None => 0,
            Some(c) => c
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| HandoverError::Chat(format!("invalid cursor: {c}")))?,
        };

        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(index)
            .cloned()
            .unwrap_or_default())
    }

    async fn post_message(&self, blocks: &[Block]) -> HandoverResult<()> {
        Self::check(&self.fail_post)?;
        self.posted.lock().unwrap().push(blocks.to_vec());
        Ok(())
    }

    async fn open_modal(&self, trigger_id: &str, view: &ModalView) -> HandoverResult<()> {
        Self::check(&self.fail_modals)?;
        self.opened
            .lock()
            .unwrap()
            .push((trigger_id.to_string(), view.clone()));
        Ok(())
    }

    async fn update_modal(&self, view_id: &str, view: &ModalView) -> HandoverResult<()> {
        Self::check(&self.fail_modals)?;
        self.modal_updates
            .lock()
            .unwrap()
            .push((view_id.to_string(), view.clone()));
        Ok(())
    }
}
