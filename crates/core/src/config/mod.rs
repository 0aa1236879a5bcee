//! 配置管理
//!
//! 加载顺序：内置默认值 → TOML 配置文件 → 环境变量（前缀 `HANDOVER`，层级分隔符 `__`）。
//! 凭据类字段没有默认值，缺失时 [`AppConfig::validate`] 直接失败，进程拒绝启动。

pub mod models;

pub use models::{
    ApiConfig, AppConfig, ChatConfig, ObservabilityConfig, ScheduleConfig, TrackerConfig,
    TriggerConfig,
};
