use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::HandoverError;

/// 可调度的任务种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// 早班更新：刷新夜班交接工单并附带问候语
    AmUpdate,
    /// 中班交接
    MidHandover,
    /// 中班站会提醒
    StandupReminder,
    /// 夜班交接
    OvernightHandover,
    /// 待跟进工单提醒
    FollowupReminder,
}

impl JobKind {
    pub const ALL: [JobKind; 5] = [
        JobKind::AmUpdate,
        JobKind::MidHandover,
        JobKind::StandupReminder,
        JobKind::OvernightHandover,
        JobKind::FollowupReminder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::AmUpdate => "am_update",
            JobKind::MidHandover => "mid_handover",
            JobKind::StandupReminder => "standup_reminder",
            JobKind::OvernightHandover => "overnight_handover",
            JobKind::FollowupReminder => "followup_reminder",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobKind::ALL
            .iter()
            .copied()
            .find(|job| job.as_str() == s)
            .ok_or_else(|| HandoverError::UnknownJob(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_kind_names_round_trip_through_serde() {
        for job in JobKind::ALL {
            let encoded = serde_json::to_string(&job).unwrap();
            assert_eq!(encoded, format!("\"{}\"", job.as_str()));
            assert_eq!(job.as_str().parse::<JobKind>().unwrap(), job);
        }
        assert!("lunch_break".parse::<JobKind>().is_err());
    }
}
