//! 聊天平台客户端：Web API 负责频道列表与弹窗，incoming webhook 负责发消息

use async_trait::async_trait;
use handover_core::{
    Block, Channel, ChannelPage, ChatConfig, ChatPlatform, HandoverError, HandoverResult, ModalView,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

/// 每页请求的频道数
pub const CHANNEL_PAGE_LIMIT: u32 = 200;

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConversationsList {
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

pub struct SlackClient {
    api_base_url: String,
    bot_token: String,
    webhook_url: String,
    http_client: reqwest::Client,
}

impl SlackClient {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            webhook_url: config.webhook_url.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base_url)
    }

    /// 调用 Web API 方法并检查响应中的 `ok` 字段
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> HandoverResult<T> {
        let response = request
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|e| {
                error!("聊天平台 {} 请求失败: {}", method, e);
                HandoverError::Chat(format!("{method} connection error: {e}"))
            })?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| HandoverError::Chat(format!("{method} returned HTTP {status}: {e}")))?;

        let envelope: ApiEnvelope = serde_json::from_value(body.clone())?;
        if !envelope.ok {
            let reason = envelope.error.unwrap_or_else(|| "unknown_error".to_string());
            error!("聊天平台 {} 返回错误: {}", method, reason);
            return Err(HandoverError::Chat(format!("{method} failed: {reason}")));
        }

        Ok(serde_json::from_value(body)?)
    }
}

pub fn webhook_payload(blocks: &[Block]) -> Value {
    json!({ "blocks": blocks })
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn list_channels(&self, cursor: Option<&str>) -> HandoverResult<ChannelPage> {
        let limit = CHANNEL_PAGE_LIMIT.to_string();
        let mut query = vec![
            ("exclude_archived", "false"),
            ("types", "public_channel"),
            ("limit", limit.as_str()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let request = self
            .http_client
            .get(self.method_url("conversations.list"))
            .query(&query);
        let list: ConversationsList = self.call("conversations.list", request).await?;

        let next_cursor = list
            .response_metadata
            .map(|m| m.next_cursor)
            .filter(|c| !c.is_empty());
        debug!("获取到 {} 个频道，还有下一页: {}", list.channels.len(), next_cursor.is_some());

        Ok(ChannelPage {
            channels: list.channels,
            next_cursor,
        })
    }

    async fn post_message(&self, blocks: &[Block]) -> HandoverResult<()> {
        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&webhook_payload(blocks))
            .send()
            .await
            .map_err(|e| HandoverError::Chat(format!("webhook connection error: {e}")))?;

        let status = response.status();
        if status.is_success() {
            debug!("消息已发送，共 {} 个块", blocks.len());
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!("发送消息失败: HTTP {} - {}", status, body);
        Err(HandoverError::Chat(format!(
            "webhook failed: HTTP {status} - {body}"
        )))
    }

    async fn open_modal(&self, trigger_id: &str, view: &ModalView) -> HandoverResult<()> {
        let request = self
            .http_client
            .post(self.method_url("views.open"))
            .json(&json!({ "trigger_id": trigger_id, "view": view }));
        let _: Value = self.call("views.open", request).await?;
        Ok(())
    }

    async fn update_modal(&self, view_id: &str, view: &ModalView) -> HandoverResult<()> {
        let request = self
            .http_client
            .post(self.method_url("views.update"))
            .json(&json!({ "view_id": view_id, "view": view }));
        let _: Value = self.call("views.update", request).await?;
        Ok(())
    }
}
