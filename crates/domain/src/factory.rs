//! 分组工厂
//!
//! 从工单系统或聊天平台拉取原始数据，按需做待跟进筛选，再映射为 [`LineItem`]。
//! 外部调用失败直接向上传播，整个报告随之失败，不会渲染残缺的分组。

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use handover_core::{
    Channel, ChatPlatform, HandoverError, HandoverResult, Issue, IssueTracker,
};
use tracing::{debug, info};

use crate::followup::filter_followup_at;
use crate::line_item::LineItem;
use crate::registry::{ComponentRegistry, ComponentSpec, SectionSource};
use crate::section::Section;
use crate::template::LineTemplate;

/// 频道名必须同时包含的关键字（区分大小写）
pub const CHANNEL_KEYWORDS: [&str; 2] = ["issue", "noc"];

/// 截止日期等于当天时显示的标记
pub const DUE_TODAY: &str = "TODAY";

#[derive(Clone)]
pub struct SectionFactory {
    tracker: Arc<dyn IssueTracker>,
    chat: Arc<dyn ChatPlatform>,
    timezone: Tz,
    channel_url_base: String,
}

impl SectionFactory {
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        chat: Arc<dyn ChatPlatform>,
        timezone: Tz,
        channel_url_base: impl Into<String>,
    ) -> Self {
        Self {
            tracker,
            chat,
            timezone,
            channel_url_base: channel_url_base.into(),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// 生成完整交接报告的全部分组
    pub async fn build_handover(&self) -> HandoverResult<Vec<Section>> {
        self.build_all(&ComponentRegistry::handover_components(), Utc::now())
            .await
    }

    /// 按报告名称生成分组，`full_ho` 展开为完整交接报告
    pub async fn build_report(&self, name: &str) -> HandoverResult<Vec<Section>> {
        let specs = ComponentRegistry::resolve(name)?;
        self.build_all(&specs, Utc::now()).await
    }

    pub async fn build_all(
        &self,
        specs: &[&ComponentSpec],
        now: DateTime<Utc>,
    ) -> HandoverResult<Vec<Section>> {
        let mut sections = Vec::with_capacity(specs.len());
        for spec in specs {
            sections.push(self.build_at(spec, now).await?);
        }
        Ok(sections)
    }

    pub async fn build(&self, spec: &ComponentSpec) -> HandoverResult<Section> {
        self.build_at(spec, Utc::now()).await
    }

    /// 以给定的 `now` 生成单个分组（待跟进判定与"今天"都以它为准）
    pub async fn build_at(&self, spec: &ComponentSpec, now: DateTime<Utc>) -> HandoverResult<Section> {
        let template = LineTemplate::parse(spec.line_format)?;

        let items = match spec.source {
            SectionSource::IssueTracker {
                query,
                only_followup,
            } => {
                self.issue_items(query, only_followup, &template, now)
                    .await?
            }
            SectionSource::ChatPlatform { archived } => self.channel_items(archived).await?,
        };

        info!("已生成分组 \"{}\"，共 {} 条", spec.heading, items.len());

        Ok(Section::new(spec.heading, template, items)
            .with_empty_message(spec.message_if_none)
            .with_show_count(spec.show_count))
    }

    async fn issue_items(
        &self,
        query: &str,
        only_followup: bool,
        template: &LineTemplate,
        now: DateTime<Utc>,
    ) -> HandoverResult<Vec<LineItem>> {
        let mut issues = self.tracker.search(query).await?;
        debug!("查询返回 {} 个工单: {}", issues.len(), query);

        if only_followup {
            issues = filter_followup_at(issues, now)?;
        }

        let today = now.with_timezone(&self.timezone).date_naive();
        Ok(issues
            .iter()
            .map(|issue| issue_line_item(issue, template, today))
            .collect())
    }

    async fn channel_items(&self, archived: bool) -> HandoverResult<Vec<LineItem>> {
        self.relevant_channels(archived)
            .await?
            .iter()
            .map(|channel| channel_line_item(channel, self.timezone, &self.channel_url_base))
            .collect()
    }

    /// 翻页拉取全部频道，筛选后按创建时间倒序排列
    pub async fn relevant_channels(&self, archived: bool) -> HandoverResult<Vec<Channel>> {
        let mut relevant = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.chat.list_channels(cursor.as_deref()).await?;
            relevant.extend(
                page.channels
                    .into_iter()
                    .filter(|c| channel_is_relevant(c, archived)),
            );

            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        relevant.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(relevant)
    }
}

/// 频道名包含全部关键字且归档状态与筛选条件一致
pub fn channel_is_relevant(channel: &Channel, archived: bool) -> bool {
    CHANNEL_KEYWORDS.iter().all(|kw| channel.name.contains(kw)) && channel.is_archived == archived
}

/// 把工单映射为条目。日期字段截断为创建日期与"日期_时:分"的更新时间。
pub fn issue_line_item(issue: &Issue, template: &LineTemplate, today: NaiveDate) -> LineItem {
    let fields = &issue.fields;
    let created: String = fields.created.chars().take(10).collect();
    let updated: String = fields
        .updated
        .chars()
        .take(16)
        .map(|c| if c == 'T' { '_' } else { c })
        .collect();

    let mut item = LineItem::new()
        .with("key", issue.key.as_str())
        .with_optional("priority", issue.priority_name().map(str::to_string))
        .with("created", created)
        .with("updated", updated)
        .with("summary", fields.summary.as_str())
        .with("link", issue.permalink.as_str());

    if template.references("due") {
        let today = today.format("%Y-%m-%d").to_string();
        let due = fields.duedate.as_ref().map(|due| {
            if *due == today {
                DUE_TODAY.to_string()
            } else {
                due.clone()
            }
        });
        item = item.with_optional("due", due);
    }

    if template.references("parent_key") {
        item = item.with_optional("parent_key", issue.parent_key().map(str::to_string));
    }

    item
}

/// 把频道映射为条目，创建日期按本地时区换算
pub fn channel_line_item(channel: &Channel, timezone: Tz, url_base: &str) -> HandoverResult<LineItem> {
    let created = DateTime::from_timestamp(channel.created, 0).ok_or_else(|| {
        HandoverError::Timestamp {
            value: channel.created.to_string(),
            message: format!("频道 {} 的创建时间超出范围", channel.name),
        }
    })?;

    Ok(LineItem::new()
        .with("key", channel.name.as_str())
        .with(
            "created",
            created.with_timezone(&timezone).date_naive().to_string(),
        )
        .with("summary", channel.topic.value.as_str())
        .with("link", format!("{url_base}{}", channel.id)))
}
