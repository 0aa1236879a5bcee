//! 定时任务循环
//!
//! 在所有启用的触发器中找出最早的下一次触发时间，睡到该时刻后依次执行到期的任务。
//! 任务串行执行，互不重叠；单个任务失败只记录日志，不影响后续触发。

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use handover_core::{HandoverResult, JobKind, ScheduleConfig};
use tokio::sync::broadcast;
use tracing::{error, info, info_span, warn, Instrument};

use crate::cron_utils::CronScheduler;
use crate::orchestrator::JobRunner;

/// 已解析的触发器
#[derive(Debug, Clone)]
pub struct ScheduledTrigger {
    pub job: JobKind,
    pub expr: String,
    cron: CronScheduler,
}

impl ScheduledTrigger {
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.cron.next_execution_time(after)
    }

    pub fn upcoming(&self, after: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
        self.cron.upcoming_times(after, count)
    }
}

pub struct JobScheduler {
    triggers: Vec<ScheduledTrigger>,
    timezone: Tz,
    misfire_grace: Duration,
}

impl JobScheduler {
    /// 只装载启用的触发器，任一CRON表达式无效即返回错误
    pub fn from_config(config: &ScheduleConfig) -> HandoverResult<Self> {
        let timezone = config.tz()?;
        let triggers = config
            .enabled_triggers()
            .map(|t| {
                Ok(ScheduledTrigger {
                    job: t.job,
                    expr: t.cron.clone(),
                    cron: CronScheduler::new(&t.cron, timezone)?,
                })
            })
            .collect::<HandoverResult<Vec<_>>>()?;

        Ok(Self {
            triggers,
            timezone,
            misfire_grace: Duration::seconds(config.misfire_grace_seconds as i64),
        })
    }

    pub fn triggers(&self) -> &[ScheduledTrigger] {
        &self.triggers
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// `after` 之后最早的触发时刻，以及该时刻到期的全部任务（按配置顺序）
    pub fn next_due(&self, after: DateTime<Utc>) -> Option<(DateTime<Utc>, Vec<JobKind>)> {
        let fires: Vec<(DateTime<Utc>, JobKind)> = self
            .triggers
            .iter()
            .filter_map(|t| t.next_fire(after).map(|at| (at, t.job)))
            .collect();

        let earliest = fires.iter().map(|(at, _)| *at).min()?;
        let due = fires
            .into_iter()
            .filter(|(at, _)| *at == earliest)
            .map(|(_, job)| job)
            .collect();

        Some((earliest, due))
    }

    /// 运行调度循环直到收到关闭信号。关闭信号只在两次触发之间生效，不会打断正在执行的任务。
    pub async fn run<R: JobRunner>(&self, runner: &mut R, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("启动任务调度器，共 {} 个触发器，时区 {}", self.triggers.len(), self.timezone);

        let mut after = Utc::now();

        loop {
            let Some((fire_at, due)) = self.next_due(after) else {
                warn!("没有可触发的任务，等待关闭信号");
                let _ = shutdown_rx.recv().await;
                break;
            };

            let wait = (fire_at - Utc::now()).to_std().unwrap_or_default();
            info!(
                "下一次触发: {} {:?}",
                fire_at.with_timezone(&self.timezone).format("%Y-%m-%d %H:%M:%S %Z"),
                due
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown_rx.recv() => {
                    info!("调度器循环收到关闭信号");
                    break;
                }
            }

            let lateness = Utc::now() - fire_at;
            if lateness > self.misfire_grace {
                warn!(
                    "错过触发时间 {} 秒，跳过任务 {:?}",
                    lateness.num_seconds(),
                    due
                );
            } else {
                for job in due {
                    run_one(runner, job).await;
                }
            }

            after = fire_at;
        }

        info!("任务调度器已停止");
    }
}

/// 执行单个任务，错误只记录日志
pub async fn run_one<R: JobRunner>(runner: &mut R, job: JobKind) {
    let span = info_span!("job", name = %job);
    async {
        info!("任务开始");
        match runner.run_job(job).await {
            Ok(()) => info!("任务完成"),
            Err(e) => error!("任务失败: {}", e),
        }
    }
    .instrument(span)
    .await
}
