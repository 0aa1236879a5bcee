use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use handover_core::{AppConfig, JobKind};
use handover_testing_utils::{IssueBuilder, MockChatPlatform, MockIssueTracker};
use noc_handover::app::Application;
use noc_handover::shutdown::ShutdownManager;
use tower::ServiceExt;

const TEST_TOML: &str = r#"
[tracker]
base_url = "https://tracker.example.com"
project = "NOC"
issue_type = "Story"
user = "noc-bot@example.com"
token = "jira-token"

[chat]
bot_token = "xoxb-test"
webhook_url = "https://hooks.example.com/services/T000/B000/XXX"
channel_url_base = "https://example.slack.com/archives/"

[api]
enabled = false
signing_secret = "test-secret"
authorized_users = ["alice"]

[schedule]
timezone = "America/Los_Angeles"
misfire_grace_seconds = 60

[[schedule.triggers]]
job = "mid_handover"
cron = "0 30 14 * * *"

[[schedule.triggers]]
job = "followup_reminder"
cron = "0 0 9 * * *"
enabled = false
"#;

fn load_config() -> AppConfig {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(TEST_TOML.as_bytes()).unwrap();
    AppConfig::load(Some(file.path().to_str().unwrap())).unwrap()
}

fn build_app() -> (Application, MockIssueTracker, MockChatPlatform) {
    let tracker = MockIssueTracker::new();
    let chat = MockChatPlatform::new();
    let app = Application::with_collaborators(
        load_config(),
        Arc::new(tracker.clone()),
        Arc::new(chat.clone()),
    )
    .unwrap();
    (app, tracker, chat)
}

#[tokio::test]
async fn test_run_job_creates_ticket_and_posts() {
    let (mut app, tracker, chat) = build_app();

    app.run_job(JobKind::MidHandover).await.unwrap();

    let created = tracker.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].project, "NOC");
    assert!(created[0].title.starts_with("Mid-Shift NOC Handover "));
    assert_eq!(chat.posted().len(), 1);
    assert!(app.jobs().current_ticket().is_some());
}

#[tokio::test]
async fn test_run_job_propagates_tracker_failure() {
    let (mut app, tracker, chat) = build_app();
    tracker.fail_with("boom");

    let result = app.run_job(JobKind::OvernightHandover).await;

    assert!(result.is_err());
    assert!(chat.posted().is_empty());
}

#[tokio::test]
async fn test_am_update_without_ticket_is_noop() {
    let (mut app, tracker, chat) = build_app();

    app.run_job(JobKind::AmUpdate).await.unwrap();

    assert!(tracker.updated().is_empty());
    assert!(chat.posted().is_empty());
}

#[tokio::test]
async fn test_preview_renders_plain_text() {
    let (app, tracker, _chat) = build_app();
    tracker.set_results(
        r#"project = NOC AND (type = Incident or type = "Platform Partner Outage") AND status != Closed ORDER by priority DESC, key DESC"#,
        vec![IssueBuilder::new("NOC-7")
            .with_summary("Edge latency in us-west")
            .with_priority(2)
            .build()],
    );

    let text = app.preview("outstanding_incidents").await.unwrap();

    assert!(text.contains("Outstanding Incidents"));
    assert!(text.contains("NOC-7"));
    assert!(text.contains("Edge latency in us-west"));
}

#[tokio::test]
async fn test_preview_unknown_component_fails() {
    let (app, _tracker, _chat) = build_app();

    assert!(app.preview("not_a_report").await.is_err());
}

#[test]
fn test_schedule_table_lists_enabled_and_disabled_triggers() {
    let (app, _tracker, _chat) = build_app();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let lines = app.schedule_table(now, 2);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("mid_handover"));
    // 14:30 PST = 22:30Z
    assert!(lines[0].contains("2024-03-01 14:30 PST"));
    assert!(lines[0].contains("2024-03-02 14:30 PST"));
    assert!(lines[1].starts_with("followup_reminder"));
    assert!(lines[1].ends_with("(disabled)"));
}

#[tokio::test]
async fn test_api_router_serves_health() {
    let (app, _tracker, _chat) = build_app();

    let response = app
        .api_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let (app, _tracker, _chat) = build_app();
    let shutdown = ShutdownManager::new();
    let rx = shutdown.subscribe().await;

    let handle = tokio::spawn(app.run(rx));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    shutdown.shutdown().await;

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_run_until_fails_when_bind_address_is_taken() {
    let held = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = held.local_addr().unwrap();

    let toml = TEST_TOML.replace(
        "enabled = false\nsigning_secret",
        &format!("enabled = true\nbind_address = \"{address}\"\nsigning_secret"),
    );
    let config = AppConfig::from_toml(&toml).unwrap();
    assert!(config.api.enabled);

    let app = Application::with_collaborators(
        config,
        Arc::new(MockIssueTracker::new()),
        Arc::new(MockChatPlatform::new()),
    )
    .unwrap();

    // 关闭信号永远不会到来，应用必须自行以错误退出
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        app.run_until(std::future::pending::<anyhow::Result<()>>()),
    )
    .await
    .unwrap();

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("绑定地址失败"));
}

#[tokio::test]
async fn test_run_until_returns_ok_after_signal() {
    let (app, _tracker, _chat) = build_app();

    let signal = async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Ok::<(), anyhow::Error>(())
    };

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), app.run_until(signal))
        .await
        .unwrap();
    assert!(result.is_ok());
}
