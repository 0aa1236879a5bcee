use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::JobKind;
use crate::{HandoverError, HandoverResult};

fn default_enabled() -> bool {
    true
}

/// 单个定时触发器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub job: JobKind,
    /// 六段式CRON表达式（秒 分 时 日 月 周），按 `schedule.timezone` 的本地时间解释
    pub cron: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl TriggerConfig {
    pub fn new(job: JobKind, cron: &str, enabled: bool) -> Self {
        Self {
            job,
            cron: cron.to_string(),
            enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// IANA时区名
    pub timezone: String,
    /// 错过触发时间超过该秒数的任务直接跳过
    pub misfire_grace_seconds: u64,
    pub triggers: Vec<TriggerConfig>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Los_Angeles".to_string(),
            misfire_grace_seconds: 60,
            triggers: vec![
                TriggerConfig::new(JobKind::AmUpdate, "0 30 5 * * *", true),
                TriggerConfig::new(JobKind::MidHandover, "0 30 14 * * *", true),
                TriggerConfig::new(JobKind::StandupReminder, "0 0 15 * * *", true),
                TriggerConfig::new(JobKind::OvernightHandover, "0 30 23 * * *", true),
                TriggerConfig::new(JobKind::FollowupReminder, "0 0 9 * * *", false),
                TriggerConfig::new(JobKind::FollowupReminder, "0 0 14 * * *", false),
                TriggerConfig::new(JobKind::FollowupReminder, "0 0 17 * * *", false),
            ],
        }
    }
}

impl ScheduleConfig {
    pub fn tz(&self) -> HandoverResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| HandoverError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn enabled_triggers(&self) -> impl Iterator<Item = &TriggerConfig> {
        self.triggers.iter().filter(|t| t.enabled)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.tz()?;

        for trigger in &self.triggers {
            if trigger.cron.split_whitespace().count() < 6 {
                return Err(anyhow::anyhow!(
                    "任务 {} 的CRON表达式需要至少6段: {}",
                    trigger.job,
                    trigger.cron
                ));
            }
        }

        Ok(())
    }
}
