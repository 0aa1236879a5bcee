//! 请求签名校验
//!
//! 签名为 `v0=` 加上 HMAC-SHA256(`v0:{timestamp}:{body}`) 的十六进制摘要。
//! 时间戳与当前时间相差超过允许窗口的请求一律拒绝，防止重放。

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const SIGNATURE_VERSION: &str = "v0";

fn mac(secret: &[u8], timestamp: &str, body: &[u8]) -> Result<HmacSha256, ApiError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| ApiError::Internal(format!("无效的签名密钥: {e}")))?;
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Ok(mac)
}

/// 计算请求签名（`v0=<hex>`）
pub fn compute_signature(secret: &[u8], timestamp: &str, body: &[u8]) -> Result<String, ApiError> {
    let digest = mac(secret, timestamp, body)?.finalize().into_bytes();
    Ok(format!("{SIGNATURE_VERSION}={}", hex::encode(digest)))
}

#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
    max_age_seconds: i64,
}

impl SignatureVerifier {
    pub fn new(secret: &str, max_age_seconds: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            max_age_seconds,
        }
    }

    /// 校验时间戳窗口与签名，签名比较为常量时间
    pub fn verify(
        &self,
        timestamp: &str,
        signature: &str,
        body: &[u8],
        now: i64,
    ) -> Result<(), ApiError> {
        let sent_at: i64 = timestamp.trim().parse().map_err(|_| ApiError::StaleRequest)?;
        if (now - sent_at).abs() > self.max_age_seconds {
            return Err(ApiError::StaleRequest);
        }

        let expected = signature
            .strip_prefix(SIGNATURE_VERSION)
            .and_then(|s| s.strip_prefix('='))
            .and_then(|hex_digest| hex::decode(hex_digest).ok())
            .ok_or(ApiError::InvalidSignature)?;

        mac(&self.secret, timestamp, body)?
            .verify_slice(&expected)
            .map_err(|_| ApiError::InvalidSignature)
    }
}
