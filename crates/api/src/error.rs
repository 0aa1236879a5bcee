use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use handover_core::HandoverError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("请求签名无效")]
    InvalidSignature,

    #[error("请求时间戳已过期或无效")]
    StaleRequest,

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("未知的报告选项: {0}")]
    UnknownSelection(String),

    #[error("处理失败: {0}")]
    Handover(#[from] HandoverError),

    #[error("内部服务器错误: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidSignature | ApiError::StaleRequest => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::UnknownSelection(_) => StatusCode::BAD_REQUEST,
            ApiError::Handover(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidSignature => "INVALID_SIGNATURE",
            ApiError::StaleRequest => "STALE_REQUEST",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::UnknownSelection(_) => "UNKNOWN_SELECTION",
            ApiError::Handover(_) | ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("请求处理失败: {}", self);
        } else {
            tracing::warn!("请求被拒绝: {}", self);
        }

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": self.error_type(),
                "code": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}
