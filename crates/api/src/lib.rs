//! 按需报告的 HTTP 入口：斜杠命令、弹窗交互回调与健康检查

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod signature;
pub mod views;

pub use error::ApiError;
pub use routes::{create_routes, AppState};
pub use signature::{compute_signature, SignatureVerifier};
