pub mod api_observability;
pub mod app_config;
pub mod schedule;
pub mod tracker_chat;

pub use api_observability::{ApiConfig, ObservabilityConfig};
pub use app_config::AppConfig;
pub use schedule::{ScheduleConfig, TriggerConfig};
pub use tracker_chat::{ChatConfig, TrackerConfig};
