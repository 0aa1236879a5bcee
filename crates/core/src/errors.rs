use thiserror::Error;

/// 交接服务错误类型定义
#[derive(Debug, Error)]
pub enum HandoverError {
    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("无效的CRON表达式: {expr} - {message}")]
    InvalidCron { expr: String, message: String },

    #[error("无效的时区: {0}")]
    InvalidTimezone(String),

    #[error("未知的报告组件: {0}")]
    UnknownComponent(String),

    #[error("未知的任务: {0}")]
    UnknownJob(String),

    #[error("行模板 '{template}' 引用了不存在的字段: {field}")]
    MissingField { field: String, template: String },

    #[error("无效的行模板 '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("无效的时间戳 '{value}': {message}")]
    Timestamp { value: String, message: String },

    #[error("工单系统错误: {0}")]
    Tracker(String),

    #[error("聊天平台错误: {0}")]
    Chat(String),

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for HandoverError {
    fn from(err: serde_json::Error) -> Self {
        HandoverError::Serialization(err.to_string())
    }
}

/// 统一的Result类型
pub type Result<T> = std::result::Result<T, HandoverError>;
