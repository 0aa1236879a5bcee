use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::routes::AppState;
use crate::views;

/// 斜杠命令请求中用到的字段
#[derive(Debug, Deserialize)]
pub struct SlashCommand {
    pub user_name: String,
    pub trigger_id: String,
}

/// 打开按需报告弹窗。未授权的用户收到一条只有自己可见的提示。
pub async fn noc_status(
    State(state): State<AppState>,
    form: Result<Form<SlashCommand>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(command) = form.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if !state.authorized_users.contains(&command.user_name) {
        warn!("用户 {} 无权查看按需报告", command.user_name);
        return Ok(Json(json!({
            "text": format!("User {} is not authorized to do that ;(", command.user_name)
        }))
        .into_response());
    }

    state
        .chat
        .open_modal(&command.trigger_id, &views::initial_view())
        .await?;
    info!("已为用户 {} 打开按需报告弹窗", command.user_name);

    Ok(StatusCode::OK.into_response())
}
