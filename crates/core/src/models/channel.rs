use serde::{Deserialize, Serialize};

/// 聊天平台频道
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
    /// 创建时间（Unix秒）
    pub created: i64,
    #[serde(default)]
    pub topic: ChannelTopic,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelTopic {
    #[serde(default)]
    pub value: String,
}

/// 频道列表的一页结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelPage {
    pub channels: Vec<Channel>,
    /// 为空表示已是最后一页
    pub next_cursor: Option<String>,
}
