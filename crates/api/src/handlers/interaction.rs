use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form,
};
use handover_dispatcher::on_demand_report;
use handover_domain::ComponentRegistry;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::ApiError;
use crate::routes::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    pub payload: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractionPayload {
    pub view: ViewRef,
    pub actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
pub struct ViewRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct Action {
    pub value: String,
}

/// 处理按钮点击：先切换到加载中视图后立即返回，报告在后台任务中生成
pub async fn interaction(
    State(state): State<AppState>,
    form: Result<Form<InteractionForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let Form(form) = form.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let payload: InteractionPayload = serde_json::from_str(&form.payload)
        .map_err(|e| ApiError::BadRequest(format!("无法解析交互负载: {e}")))?;

    let selection = payload
        .actions
        .into_iter()
        .next()
        .map(|a| a.value)
        .ok_or_else(|| ApiError::BadRequest("交互负载中没有动作".to_string()))?;

    if !ComponentRegistry::is_known(&selection) {
        return Err(ApiError::UnknownSelection(selection));
    }

    let view_id = payload.view.id;
    state.chat.update_modal(&view_id, &views::interim_view()).await?;
    info!("视图 {} 已切换为加载中，开始生成报告 {}", view_id, selection);

    tokio::spawn(render_final_view(state, view_id, selection));

    Ok(StatusCode::OK)
}

/// 生成报告并替换弹窗内容；失败时替换为错误提示
pub async fn render_final_view(state: AppState, view_id: String, selection: String) {
    let view = match on_demand_report(&state.factory, &selection).await {
        Ok(blocks) => views::final_view(blocks),
        Err(e) => {
            error!("生成按需报告 {} 失败: {}", selection, e);
            views::error_view()
        }
    };

    if let Err(e) = state.chat.update_modal(&view_id, &view).await {
        error!("更新视图 {} 失败: {}", view_id, e);
    }
}
