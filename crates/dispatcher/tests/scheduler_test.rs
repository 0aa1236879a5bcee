use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use handover_core::{HandoverError, HandoverResult, JobKind, ScheduleConfig, TriggerConfig};
use handover_dispatcher::scheduler::{run_one, JobScheduler};
use handover_dispatcher::JobRunner;
use tokio::sync::broadcast;

#[derive(Default)]
struct RecordingRunner {
    runs: Vec<JobKind>,
    fail: bool,
}

#[async_trait]
impl JobRunner for RecordingRunner {
    async fn run_job(&mut self, job: JobKind) -> HandoverResult<()> {
        self.runs.push(job);
        if self.fail {
            return Err(HandoverError::Chat("webhook returned 500".to_string()));
        }
        Ok(())
    }
}

fn config(triggers: Vec<TriggerConfig>) -> ScheduleConfig {
    ScheduleConfig {
        timezone: "America/Los_Angeles".to_string(),
        misfire_grace_seconds: 60,
        triggers,
    }
}

#[test]
fn test_default_schedule_loads_enabled_triggers_only() {
    let scheduler = JobScheduler::from_config(&ScheduleConfig::default()).unwrap();
    let jobs: Vec<JobKind> = scheduler.triggers().iter().map(|t| t.job).collect();
    assert_eq!(
        jobs,
        vec![
            JobKind::AmUpdate,
            JobKind::MidHandover,
            JobKind::StandupReminder,
            JobKind::OvernightHandover,
        ]
    );
}

#[test]
fn test_invalid_cron_rejected() {
    let result = JobScheduler::from_config(&config(vec![TriggerConfig::new(
        JobKind::AmUpdate,
        "0 61 5 * * *",
        true,
    )]));
    assert!(matches!(result, Err(HandoverError::InvalidCron { .. })));
}

#[test]
fn test_invalid_cron_on_disabled_trigger_is_ignored() {
    let result = JobScheduler::from_config(&config(vec![
        TriggerConfig::new(JobKind::AmUpdate, "0 30 5 * * *", true),
        TriggerConfig::new(JobKind::FollowupReminder, "garbage", false),
    ]));
    assert!(result.is_ok());
}

#[test]
fn test_next_due_follows_daily_order() {
    let scheduler = JobScheduler::from_config(&ScheduleConfig::default()).unwrap();

    // 洛杉矶 2024-03-01 06:00 (PST)
    let morning = Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap();
    let (at, jobs) = scheduler.next_due(morning).unwrap();
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 3, 1, 22, 30, 0).unwrap());
    assert_eq!(jobs, vec![JobKind::MidHandover]);

    let (at, jobs) = scheduler.next_due(at).unwrap();
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap());
    assert_eq!(jobs, vec![JobKind::StandupReminder]);

    let (at, jobs) = scheduler.next_due(at).unwrap();
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 3, 2, 7, 30, 0).unwrap());
    assert_eq!(jobs, vec![JobKind::OvernightHandover]);

    let (_, jobs) = scheduler.next_due(at).unwrap();
    assert_eq!(jobs, vec![JobKind::AmUpdate]);
}

#[test]
fn test_simultaneous_triggers_run_in_config_order() {
    let scheduler = JobScheduler::from_config(&config(vec![
        TriggerConfig::new(JobKind::MidHandover, "0 30 14 * * *", true),
        TriggerConfig::new(JobKind::FollowupReminder, "0 30 14 * * *", true),
    ]))
    .unwrap();

    let (_, jobs) = scheduler
        .next_due(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        .unwrap();
    assert_eq!(jobs, vec![JobKind::MidHandover, JobKind::FollowupReminder]);
}

#[test]
fn test_no_triggers_means_nothing_due() {
    let scheduler = JobScheduler::from_config(&config(vec![])).unwrap();
    assert!(scheduler.next_due(Utc::now()).is_none());
}

#[tokio::test]
async fn test_failed_job_does_not_panic() {
    let mut runner = RecordingRunner {
        fail: true,
        ..Default::default()
    };
    run_one(&mut runner, JobKind::StandupReminder).await;
    assert_eq!(runner.runs, vec![JobKind::StandupReminder]);
}

#[tokio::test]
async fn test_loop_fires_and_stops_on_shutdown() {
    let scheduler = JobScheduler::from_config(&config(vec![TriggerConfig::new(
        JobKind::StandupReminder,
        "* * * * * *",
        true,
    )]))
    .unwrap();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let handle = tokio::spawn(async move {
        let mut runner = RecordingRunner {
            fail: true,
            ..Default::default()
        };
        scheduler.run(&mut runner, shutdown_rx).await;
        runner
    });

    tokio::time::sleep(StdDuration::from_millis(2500)).await;
    shutdown_tx.send(()).unwrap();

    let runner = tokio::time::timeout(StdDuration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(!runner.runs.is_empty());
    assert!(runner.runs.iter().all(|job| *job == JobKind::StandupReminder));
}

#[tokio::test]
async fn test_loop_without_triggers_waits_for_shutdown() {
    let scheduler = JobScheduler::from_config(&config(vec![])).unwrap();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let handle = tokio::spawn(async move {
        let mut runner = RecordingRunner::default();
        scheduler.run(&mut runner, shutdown_rx).await;
        runner
    });

    shutdown_tx.send(()).unwrap();
    let runner = tokio::time::timeout(StdDuration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(runner.runs.is_empty());
}
