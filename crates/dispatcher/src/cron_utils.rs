use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::str::FromStr;

use handover_core::{HandoverError, HandoverResult};

/// CRON表达式解析和调度工具，表达式按给定时区的本地时间解释
#[derive(Debug, Clone)]
pub struct CronScheduler {
    schedule: Schedule,
    timezone: Tz,
}

impl CronScheduler {
    /// 创建新的CRON调度器
    pub fn new(cron_expr: &str, timezone: Tz) -> HandoverResult<Self> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| HandoverError::InvalidCron {
            expr: cron_expr.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { schedule, timezone })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// 获取 `from` 之后（不含）的下一次执行时间
    pub fn next_execution_time(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&from.with_timezone(&self.timezone))
            .next()
            .map(|t| t.with_timezone(&Utc))
    }

    /// 获取从指定时间开始的多个执行时间
    pub fn upcoming_times(&self, from: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
        self.schedule
            .after(&from.with_timezone(&self.timezone))
            .take(count)
            .map(|t| t.with_timezone(&Utc))
            .collect()
    }

    /// 计算下次执行时间距离现在的时长
    pub fn time_until_next_execution(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.next_execution_time(now).map(|next| next - now)
    }
}
