//! 交接任务编排
//!
//! 持有进程内唯一的可变状态：最近一次创建的交接工单。
//! 任务由调度循环串行执行，因此这里直接用 `&mut self`，不需要额外的同步原语。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use handover_core::{
    AppConfig, Block, ChatPlatform, HandoverError, HandoverResult, HandoverTicket, IssueTracker,
    JobKind,
};
use handover_domain::formatter::{handover_header, msg_builder, render_all, ticket_description};
use handover_domain::registry::{ComponentRegistry, FOLLOWUP_COMPONENT};
use handover_domain::{build_segments, SectionFactory, DEFAULT_MAX_ITEM_LEN, ON_DEMAND_MAX_ITEM_LEN};
use tracing::{debug, info};

pub const MID_SHIFT_LABEL: &str = "Mid-Shift";
pub const OVERNIGHT_LABEL: &str = "Overnight";

pub const AM_UPDATE_PREFACE: &str = "*Good morning team!*\n\
_Overnight handover ticket has been updated to include any new issues._\n\n";

pub const STANDUP_REMINDER: &str = "@here\n\n\
*Please commence mid-shift standup.*\n\
_Remember to assign and close the handover ticket._\n";

pub const FOLLOWUP_HEADING: &str = "@here\nHeads up team!\n\n";

/// 可被调度循环执行的任务集合
#[async_trait]
pub trait JobRunner: Send {
    async fn run_job(&mut self, job: JobKind) -> HandoverResult<()>;
}

/// 编排任务需要的静态参数
#[derive(Debug, Clone)]
pub struct JobOptions {
    pub project: String,
    pub issue_type: String,
    pub timezone: Tz,
    pub channel_url_base: String,
}

impl JobOptions {
    pub fn from_config(config: &AppConfig) -> HandoverResult<Self> {
        Ok(Self {
            project: config.tracker.project.clone(),
            issue_type: config.tracker.issue_type.clone(),
            timezone: config.schedule.tz()?,
            channel_url_base: config.chat.channel_url_base.clone(),
        })
    }
}

/// 交接工单标题：`{label} NOC Handover {YYYY-MM-DD}`（本地日期）
pub fn handover_title(label: &str, now: DateTime<Utc>, timezone: Tz) -> String {
    format!(
        "{label} NOC Handover {}",
        now.with_timezone(&timezone).format("%Y-%m-%d")
    )
}

pub struct HandoverJobs {
    factory: SectionFactory,
    tracker: Arc<dyn IssueTracker>,
    chat: Arc<dyn ChatPlatform>,
    options: JobOptions,
    current_ticket: Option<HandoverTicket>,
}

impl HandoverJobs {
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        chat: Arc<dyn ChatPlatform>,
        options: JobOptions,
    ) -> Self {
        let factory = SectionFactory::new(
            Arc::clone(&tracker),
            Arc::clone(&chat),
            options.timezone,
            options.channel_url_base.clone(),
        );

        Self {
            factory,
            tracker,
            chat,
            options,
            current_ticket: None,
        }
    }

    pub fn factory(&self) -> &SectionFactory {
        &self.factory
    }

    pub fn current_ticket(&self) -> Option<&HandoverTicket> {
        self.current_ticket.as_ref()
    }

    /// 生成完整交接报告，新建交接工单并在频道中发布
    pub async fn new_handover(&mut self, label: &str) -> HandoverResult<()> {
        info!("开始执行\"{}\"交接任务", label);

        let sections = self.factory.build_handover().await?;
        let title = handover_title(label, Utc::now(), self.options.timezone);
        let description = ticket_description(&sections, DEFAULT_MAX_ITEM_LEN)?;

        let ticket = self
            .tracker
            .create(
                &self.options.project,
                &title,
                &description,
                &self.options.issue_type,
            )
            .await?;
        info!("已创建交接工单 {}", ticket.key);

        self.current_ticket = Some(ticket.clone());
        self.send_handover_msg(&ticket, &sections, "").await?;

        info!("交接任务完成");
        Ok(())
    }

    /// 刷新当前交接工单并重新发布；尚无交接工单时什么也不做
    pub async fn update_handover(&mut self, preface: &str) -> HandoverResult<()> {
        let Some(ticket) = self.current_ticket.clone() else {
            debug!("尚无交接工单，跳过更新");
            return Ok(());
        };

        info!("开始更新交接工单 {}", ticket.key);

        let sections = self.factory.build_handover().await?;
        let description = ticket_description(&sections, DEFAULT_MAX_ITEM_LEN)?;
        self.tracker.update(&ticket, &description).await?;
        self.send_handover_msg(&ticket, &sections, preface).await?;

        info!("交接工单更新完成");
        Ok(())
    }

    pub async fn mid_handover(&mut self) -> HandoverResult<()> {
        self.new_handover(MID_SHIFT_LABEL).await
    }

    pub async fn overnight_handover(&mut self) -> HandoverResult<()> {
        self.new_handover(OVERNIGHT_LABEL).await
    }

    pub async fn am_update(&mut self) -> HandoverResult<()> {
        self.update_handover(AM_UPDATE_PREFACE).await
    }

    pub async fn standup_reminder(&self) -> HandoverResult<()> {
        info!("发送站会提醒");
        self.chat.post_message(&msg_builder(&[STANDUP_REMINDER])).await
    }

    /// 发布待跟进工单提醒，没有待跟进工单时不发送
    pub async fn followup_reminder(&self) -> HandoverResult<()> {
        let spec = ComponentRegistry::component(FOLLOWUP_COMPONENT)
            .ok_or_else(|| HandoverError::UnknownComponent(FOLLOWUP_COMPONENT.to_string()))?;
        let section = self.factory.build(spec).await?;

        if section.is_empty() {
            debug!("没有需要跟进的工单，跳过提醒");
            return Ok(());
        }

        let message = format!(
            "{FOLLOWUP_HEADING}{}",
            section.render(true, DEFAULT_MAX_ITEM_LEN)?
        );
        self.chat.post_message(&msg_builder(&[message])).await
    }

    pub async fn run(&mut self, job: JobKind) -> HandoverResult<()> {
        match job {
            JobKind::AmUpdate => self.am_update().await,
            JobKind::MidHandover => self.mid_handover().await,
            JobKind::StandupReminder => self.standup_reminder().await,
            JobKind::OvernightHandover => self.overnight_handover().await,
            JobKind::FollowupReminder => self.followup_reminder().await,
        }
    }

    async fn send_handover_msg(
        &self,
        ticket: &HandoverTicket,
        sections: &[handover_domain::Section],
        preface: &str,
    ) -> HandoverResult<()> {
        let mut segments = vec![handover_header(ticket, preface)];
        segments.extend(render_all(sections, true, DEFAULT_MAX_ITEM_LEN)?);
        self.chat.post_message(&msg_builder(&segments)).await
    }
}

#[async_trait]
impl JobRunner for HandoverJobs {
    async fn run_job(&mut self, job: JobKind) -> HandoverResult<()> {
        self.run(job).await
    }
}

/// 按需报告：渲染为聊天块，条目摘要使用较长的截断长度
pub async fn on_demand_report(factory: &SectionFactory, selection: &str) -> HandoverResult<Vec<Block>> {
    info!("生成按需报告: {}", selection);
    let sections = factory.build_report(selection).await?;
    build_segments(&sections, true, ON_DEMAND_MAX_ITEM_LEN)
}

/// 以纯文本形式预览报告
pub async fn preview_report(factory: &SectionFactory, selection: &str) -> HandoverResult<String> {
    let sections = factory.build_report(selection).await?;
    ticket_description(&sections, DEFAULT_MAX_ITEM_LEN)
}
