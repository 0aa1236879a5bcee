//! 交接任务的编排与定时调度

pub mod cron_utils;
pub mod orchestrator;
pub mod scheduler;

pub use cron_utils::CronScheduler;
pub use orchestrator::{on_demand_report, preview_report, HandoverJobs, JobOptions, JobRunner};
pub use scheduler::{JobScheduler, ScheduledTrigger};
