use async_trait::async_trait;

use crate::models::{Block, ChannelPage, ModalView};
use crate::HandoverResult;

/// 聊天平台协作方
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// 获取一页频道列表，首页传 `None`
    async fn list_channels(&self, cursor: Option<&str>) -> HandoverResult<ChannelPage>;

    /// 向交接频道发送消息
    async fn post_message(&self, blocks: &[Block]) -> HandoverResult<()>;

    async fn open_modal(&self, trigger_id: &str, view: &ModalView) -> HandoverResult<()>;

    async fn update_modal(&self, view_id: &str, view: &ModalView) -> HandoverResult<()>;
}
