use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;
use crate::routes::AppState;
use crate::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// 签名校验时允许缓冲的最大请求体
pub const MAX_BODY_BYTES: usize = 256 * 1024;

pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    info!("开始处理请求: {} {}", method, uri);

    let response = next.run(request).await;
    let duration = start.elapsed();

    info!(
        "完成请求处理: {} {} - 状态: {} - 耗时: {:?}",
        method,
        uri,
        response.status(),
        duration
    );

    response
}

pub fn trace_layer(
) -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
}

fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}

/// 读出请求体校验签名，校验通过后原样放回请求
pub async fn verify_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let timestamp = header(&request, TIMESTAMP_HEADER)
        .ok_or(ApiError::StaleRequest)?
        .to_string();
    let signature = header(&request, SIGNATURE_HEADER)
        .ok_or(ApiError::InvalidSignature)?
        .to_string();

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("无法读取请求体: {e}")))?;

    state.verifier.verify(
        &timestamp,
        &signature,
        &bytes,
        chrono::Utc::now().timestamp(),
    )?;

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
