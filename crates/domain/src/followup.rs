//! 待跟进判定
//!
//! 按优先级设定的"未更新时长"阈值判断工单是否需要跟进。
//! 只有 P2/P3/P4 有阈值；P1 与 P5 及以上永远不会被标记。

use chrono::{DateTime, Duration, FixedOffset, Utc};
use handover_core::{HandoverResult, Issue};

/// P2：8小时
pub const P2_THRESHOLD_SECONDS: i64 = 28_800;
/// P3：24小时
pub const P3_THRESHOLD_SECONDS: i64 = 86_400;
/// P4：1周
pub const P4_THRESHOLD_SECONDS: i64 = 604_800;

fn threshold_seconds(priority: i64) -> Option<i64> {
    match priority {
        2 => Some(P2_THRESHOLD_SECONDS),
        3 => Some(P3_THRESHOLD_SECONDS),
        4 => Some(P4_THRESHOLD_SECONDS),
        _ => None,
    }
}

/// 距上次更新的时长严格大于该优先级的阈值时返回 `true`
pub fn needs_followup(priority: i64, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match threshold_seconds(priority) {
        Some(threshold) => now - last_updated > Duration::seconds(threshold),
        None => false,
    }
}

/// 可参与待跟进判定的条目
pub trait FollowupCandidate {
    /// 未设置优先级时返回 `None`，视为不需要跟进
    fn priority_level(&self) -> HandoverResult<Option<i64>>;

    fn last_updated(&self) -> HandoverResult<DateTime<FixedOffset>>;
}

impl FollowupCandidate for Issue {
    fn priority_level(&self) -> HandoverResult<Option<i64>> {
        Issue::priority_level(self)
    }

    fn last_updated(&self) -> HandoverResult<DateTime<FixedOffset>> {
        self.updated_at()
    }
}

/// 以当前时间筛选需要跟进的条目
pub fn filter_followup<T: FollowupCandidate>(items: Vec<T>) -> HandoverResult<Vec<T>> {
    filter_followup_at(items, Utc::now())
}

/// 用同一个 `now` 判定所有条目，保持输入顺序
pub fn filter_followup_at<T: FollowupCandidate>(
    items: Vec<T>,
    now: DateTime<Utc>,
) -> HandoverResult<Vec<T>> {
    let mut flagged = Vec::with_capacity(items.len());

    for item in items {
        let Some(priority) = item.priority_level()? else {
            continue;
        };
        let last_updated = item.last_updated()?.with_timezone(&Utc);

        if needs_followup(priority, last_updated, now) {
            flagged.push(item);
        }
    }

    Ok(flagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        priority: Option<i64>,
        updated: DateTime<Utc>,
    }

    impl FollowupCandidate for Item {
        fn priority_level(&self) -> HandoverResult<Option<i64>> {
            Ok(self.priority)
        }

        fn last_updated(&self) -> HandoverResult<DateTime<FixedOffset>> {
            Ok(self.updated.fixed_offset())
        }
    }

    #[test]
    fn test_priorities_without_threshold_never_flagged() {
        let now = base();
        let ancient = now - Duration::days(3650);
        for priority in [0, 1, 5, 6, 42] {
            assert!(!needs_followup(priority, ancient, now), "P{priority}");
        }
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let now = base();
        for (priority, threshold) in [
            (2, P2_THRESHOLD_SECONDS),
            (3, P3_THRESHOLD_SECONDS),
            (4, P4_THRESHOLD_SECONDS),
        ] {
            let at = now - Duration::seconds(threshold);
            let past = now - Duration::seconds(threshold + 1);
            assert!(!needs_followup(priority, at, now), "P{priority} at boundary");
            assert!(needs_followup(priority, past, now), "P{priority} past boundary");
        }
    }

    #[test]
    fn test_sub_second_overshoot_is_flagged() {
        let now = base();
        let updated = now - Duration::seconds(P2_THRESHOLD_SECONDS) - Duration::milliseconds(500);
        assert!(needs_followup(2, updated, now));

        let just_inside = now - Duration::seconds(P3_THRESHOLD_SECONDS) + Duration::milliseconds(1);
        assert!(!needs_followup(3, just_inside, now));
    }

    #[test]
    fn test_filter_followup_uses_current_time() {
        let now = Utc::now();
        let items = vec![
            Item { name: "fresh-p3", priority: Some(3), updated: now - Duration::hours(2) },
            Item { name: "stale-p3", priority: Some(3), updated: now - Duration::hours(30) },
        ];

        let flagged = filter_followup(items).unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].name, "stale-p3");
    }

    #[test]
    fn test_examples() {
        let now = base();
        assert!(needs_followup(3, now - Duration::hours(25), now));
        assert!(!needs_followup(2, now - Duration::hours(1), now));
    }

    #[test]
    fn test_filter_preserves_order_and_skips_unprioritised() {
        let now = base();
        let items = vec![
            Item { name: "stale-p4", priority: Some(4), updated: now - Duration::days(8) },
            Item { name: "fresh-p2", priority: Some(2), updated: now - Duration::hours(1) },
            Item { name: "no-priority", priority: None, updated: now - Duration::days(30) },
            Item { name: "stale-p2", priority: Some(2), updated: now - Duration::hours(9) },
            Item { name: "old-p1", priority: Some(1), updated: now - Duration::days(30) },
        ];

        let flagged = filter_followup_at(items, now).unwrap();
        let names: Vec<&str> = flagged.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["stale-p4", "stale-p2"]);
    }

    #[test]
    fn test_filter_propagates_timestamp_errors() {
        let raw = serde_json::json!({
            "key": "NOC-9",
            "fields": {
                "summary": "bad timestamp",
                "priority": {"id": "2", "name": "2"},
                "created": "2024-03-01T08:15:42.123-0800",
                "updated": "yesterday"
            }
        });
        let issue: Issue = serde_json::from_value(raw).unwrap();
        assert!(filter_followup_at(vec![issue], base()).is_err());
    }
}
