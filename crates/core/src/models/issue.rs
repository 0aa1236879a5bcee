use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{HandoverError, HandoverResult};

/// 工单系统时间戳格式，例如 `2024-03-01T08:15:42.123-0800`
pub const TRACKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// 工单系统返回的工单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
    /// 浏览器可访问的工单链接，由客户端根据实例地址补全
    #[serde(default)]
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    pub summary: String,
    #[serde(default)]
    pub priority: Option<IssuePriority>,
    pub created: String,
    pub updated: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub duedate: Option<String>,
    #[serde(default)]
    pub parent: Option<IssueParent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePriority {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueParent {
    pub key: String,
}

impl Issue {
    /// 数字优先级（1 最高）。工单未设置优先级时返回 `None`
    pub fn priority_level(&self) -> HandoverResult<Option<i64>> {
        match &self.fields.priority {
            Some(priority) => priority.id.trim().parse::<i64>().map(Some).map_err(|e| {
                HandoverError::Serialization(format!(
                    "工单 {} 的优先级ID无法解析: {} - {e}",
                    self.key, priority.id
                ))
            }),
            None => Ok(None),
        }
    }

    /// 优先级的显示名称
    pub fn priority_name(&self) -> Option<&str> {
        self.fields.priority.as_ref().map(|p| p.name.as_str())
    }

    pub fn updated_at(&self) -> HandoverResult<DateTime<FixedOffset>> {
        parse_tracker_timestamp(&self.fields.updated)
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.fields.parent.as_ref().map(|p| p.key.as_str())
    }
}

/// 解析工单系统的时间戳
pub fn parse_tracker_timestamp(value: &str) -> HandoverResult<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, TRACKER_TIMESTAMP_FORMAT).map_err(|e| {
        HandoverError::Timestamp {
            value: value.to_string(),
            message: e.to_string(),
        }
    })
}
