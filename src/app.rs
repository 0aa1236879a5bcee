use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use chrono::{DateTime, Utc};
use handover_api::{create_routes, AppState};
use handover_core::{AppConfig, ChatPlatform, IssueTracker, JobKind};
use handover_dispatcher::{preview_report, HandoverJobs, JobOptions, JobScheduler};
use handover_infrastructure::{JiraClient, SlackClient};
use tokio::{net::TcpListener, sync::broadcast, task::JoinHandle};
use tracing::{error, info, info_span, warn, Instrument};

use crate::shutdown::ShutdownManager;

/// 收到关闭信号后等待应用退出的最长时间
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// 主应用程序：定时任务循环与按需报告 HTTP 服务
pub struct Application {
    config: AppConfig,
    chat: Arc<dyn ChatPlatform>,
    jobs: HandoverJobs,
    scheduler: JobScheduler,
}

impl Application {
    /// 使用真实的工单系统与聊天平台客户端创建应用
    pub fn new(config: AppConfig) -> Result<Self> {
        let tracker: Arc<dyn IssueTracker> = Arc::new(JiraClient::new(&config.tracker));
        let chat: Arc<dyn ChatPlatform> = Arc::new(SlackClient::new(&config.chat));
        Self::with_collaborators(config, tracker, chat)
    }

    pub fn with_collaborators(
        config: AppConfig,
        tracker: Arc<dyn IssueTracker>,
        chat: Arc<dyn ChatPlatform>,
    ) -> Result<Self> {
        info!("初始化应用程序");

        let options = JobOptions::from_config(&config).context("解析任务参数失败")?;
        let scheduler = JobScheduler::from_config(&config.schedule).context("加载定时触发器失败")?;
        let jobs = HandoverJobs::new(tracker, Arc::clone(&chat), options);

        Ok(Self {
            config,
            chat,
            jobs,
            scheduler,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jobs(&self) -> &HandoverJobs {
        &self.jobs
    }

    /// 按需报告的路由
    pub fn api_router(&self) -> Router {
        let state = AppState::new(
            Arc::clone(&self.chat),
            self.jobs.factory().clone(),
            &self.config.api,
        );
        create_routes(state)
    }

    /// 运行调度循环与（启用时的）API服务器，直到收到关闭信号
    pub async fn run(mut self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let server = if self.config.api.enabled {
            Some(self.spawn_api(shutdown_rx.resubscribe()).await?)
        } else {
            info!("API服务器已禁用");
            None
        };

        self.scheduler.run(&mut self.jobs, shutdown_rx).await;

        if let Some(handle) = server {
            handle.await.context("等待API服务器退出失败")?;
            info!("API服务器已停止");
        }

        Ok(())
    }

    /// 运行应用直到 `shutdown_signal` 完成
    ///
    /// 应用在收到信号之前自行退出（例如绑定地址失败）时返回错误，进程应以非零状态退出。
    pub async fn run_until<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let shutdown_manager = ShutdownManager::new();
        let shutdown_rx = shutdown_manager.subscribe().await;

        let mut app_handle = tokio::spawn(self.run(shutdown_rx));

        tokio::select! {
            result = &mut app_handle => {
                return match result {
                    Ok(Ok(())) => Err(anyhow::anyhow!("应用在收到关闭信号前意外退出")),
                    Ok(Err(e)) => Err(e.context("应用运行失败")),
                    Err(e) => Err(anyhow::Error::new(e).context("应用任务异常终止")),
                };
            }
            signal = shutdown_signal => signal?,
        }

        info!("收到关闭信号，开始优雅关闭...");
        shutdown_manager.shutdown().await;

        // 正在执行的任务会先跑完，这里只限制等待时间
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, app_handle).await {
            Ok(Ok(Ok(()))) => info!("应用已优雅关闭"),
            Ok(Ok(Err(e))) => return Err(e.context("应用关闭时发生错误")),
            Ok(Err(e)) => return Err(anyhow::Error::new(e).context("应用任务异常终止")),
            Err(_) => warn!("应用关闭超时，强制退出"),
        }

        Ok(())
    }

    async fn spawn_api(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<JoinHandle<()>> {
        let address = self.config.api.bind_address.clone();
        let router = self.api_router();

        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("绑定地址失败: {address}"))?;
        info!("API服务器启动在 http://{}", address);

        Ok(tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            };

            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("API服务器运行失败: {}", e);
            }
        }))
    }

    /// 立即执行一次任务，错误直接返回
    pub async fn run_job(&mut self, job: JobKind) -> Result<()> {
        self.jobs
            .run(job)
            .instrument(info_span!("job", name = %job))
            .await
            .with_context(|| format!("任务 {job} 执行失败"))
    }

    /// 以纯文本渲染报告
    pub async fn preview(&self, selection: &str) -> Result<String> {
        preview_report(self.jobs.factory(), selection)
            .await
            .with_context(|| format!("生成报告 {selection} 失败"))
    }

    /// 触发器一览：任务名、CRON表达式、之后几次的本地触发时间
    pub fn schedule_table(&self, now: DateTime<Utc>, count: usize) -> Vec<String> {
        let timezone = self.scheduler.timezone();
        let mut lines: Vec<String> = self
            .scheduler
            .triggers()
            .iter()
            .map(|trigger| {
                let upcoming: Vec<String> = trigger
                    .upcoming(now, count)
                    .iter()
                    .map(|at| at.with_timezone(&timezone).format("%Y-%m-%d %H:%M %Z").to_string())
                    .collect();
                format!(
                    "{:<20} {:<16} {}",
                    trigger.job.as_str(),
                    trigger.expr,
                    upcoming.join(", ")
                )
            })
            .collect();

        lines.extend(
            self.config
                .schedule
                .triggers
                .iter()
                .filter(|t| !t.enabled)
                .map(|t| format!("{:<20} {:<16} (disabled)", t.job.as_str(), t.cron)),
        );

        lines
    }
}
