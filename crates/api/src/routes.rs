use axum::{middleware, routing::get, routing::post, Router};
use handover_core::{ApiConfig, ChatPlatform};
use handover_domain::SectionFactory;
use std::collections::HashSet;
use std::sync::Arc;

use crate::handlers::{health::health_check, interaction::interaction, noc_status::noc_status};
use crate::middleware::{request_logging, trace_layer, verify_signature};
use crate::signature::SignatureVerifier;

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatPlatform>,
    pub factory: SectionFactory,
    pub verifier: Arc<SignatureVerifier>,
    pub authorized_users: Arc<HashSet<String>>,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatPlatform>, factory: SectionFactory, config: &ApiConfig) -> Self {
        Self {
            chat,
            factory,
            verifier: Arc::new(SignatureVerifier::new(
                &config.signing_secret,
                config.max_request_age_seconds,
            )),
            authorized_users: Arc::new(config.authorized_users.iter().cloned().collect()),
        }
    }
}

/// 创建API路由。聊天平台回调需要签名，健康检查不需要。
pub fn create_routes(state: AppState) -> Router {
    let signed = Router::new()
        .route("/noc-status", post(noc_status))
        .route("/interaction", post(interaction))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            verify_signature,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(signed)
        .layer(middleware::from_fn(request_logging))
        .layer(trace_layer())
        .with_state(state)
}
