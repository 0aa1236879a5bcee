//! Test data builders for creating test entities

use chrono::{DateTime, Duration, Utc};
use handover_core::{Channel, ChannelTopic, Issue, IssueFields, IssueParent, IssuePriority};

use crate::mocks::MOCK_TRACKER_BASE;

/// 按工单系统的格式输出时间戳
pub fn tracker_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
}

/// Builder for creating test Issue entities
pub struct IssueBuilder {
    issue: Issue,
}

impl IssueBuilder {
    pub fn new(key: &str) -> Self {
        let now = tracker_timestamp(Utc::now());
        Self {
            issue: Issue {
                key: key.to_string(),
                fields: IssueFields {
                    summary: format!("{key} summary"),
                    priority: None,
                    created: now.clone(),
                    updated: now,
                    duedate: None,
                    parent: None,
                },
                permalink: format!("{MOCK_TRACKER_BASE}/browse/{key}"),
            },
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.issue.fields.summary = summary.to_string();
        self
    }

    /// 优先级ID与名称都取该数字
    pub fn with_priority(mut self, level: i64) -> Self {
        self.issue.fields.priority = Some(IssuePriority {
            id: level.to_string(),
            name: level.to_string(),
        });
        self
    }

    pub fn with_priority_id(mut self, id: &str) -> Self {
        self.issue.fields.priority = Some(IssuePriority {
            id: id.to_string(),
            name: id.to_string(),
        });
        self
    }

    pub fn with_created(mut self, created: &str) -> Self {
        self.issue.fields.created = created.to_string();
        self
    }

    pub fn with_updated(mut self, updated: &str) -> Self {
        self.issue.fields.updated = updated.to_string();
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.issue.fields.updated = tracker_timestamp(at);
        self
    }

    /// 最近一次更新发生在 `now` 之前 `age` 时
    pub fn updated_ago(self, now: DateTime<Utc>, age: Duration) -> Self {
        self.updated_at(now - age)
    }

    pub fn with_due(mut self, due: &str) -> Self {
        self.issue.fields.duedate = Some(due.to_string());
        self
    }

    pub fn with_parent(mut self, parent_key: &str) -> Self {
        self.issue.fields.parent = Some(IssueParent {
            key: parent_key.to_string(),
        });
        self
    }

    pub fn with_permalink(mut self, permalink: &str) -> Self {
        self.issue.permalink = permalink.to_string();
        self
    }

    pub fn build(self) -> Issue {
        self.issue
    }
}

/// Builder for creating test Channel entities
pub struct ChannelBuilder {
    channel: Channel,
}

impl ChannelBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            channel: Channel {
                id: format!("C{}", name.to_uppercase().replace('-', "")),
                name: name.to_string(),
                is_archived: false,
                created: Utc::now().timestamp(),
                topic: ChannelTopic::default(),
            },
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.channel.id = id.to_string();
        self
    }

    pub fn archived(mut self) -> Self {
        self.channel.is_archived = true;
        self
    }

    pub fn created(mut self, unix_seconds: i64) -> Self {
        self.channel.created = unix_seconds;
        self
    }

    pub fn with_topic(mut self, topic: &str) -> Self {
        self.channel.topic.value = topic.to_string();
        self
    }

    pub fn build(self) -> Channel {
        self.channel
    }
}
