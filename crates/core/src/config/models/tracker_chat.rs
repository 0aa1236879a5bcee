use serde::{Deserialize, Serialize};

/// 工单系统连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub base_url: String,
    pub project: String,
    pub issue_type: String,
    pub user: String,
    pub token: String,
    /// 单次搜索返回的最大工单数
    pub max_results: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.atlassian.net".to_string(),
            project: "NOC".to_string(),
            issue_type: "Story".to_string(),
            user: String::new(),
            token: String::new(),
            max_results: 50,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("工单系统地址格式无效: {}", self.base_url));
        }

        if self.project.is_empty() {
            return Err(anyhow::anyhow!("工单项目不能为空"));
        }

        if self.user.is_empty() {
            return Err(anyhow::anyhow!("缺少工单系统用户名 (tracker.user)"));
        }

        if self.token.is_empty() {
            return Err(anyhow::anyhow!("缺少工单系统令牌 (tracker.token)"));
        }

        if self.max_results == 0 {
            return Err(anyhow::anyhow!("max_results 必须大于0"));
        }

        Ok(())
    }
}

/// 聊天平台连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub api_base_url: String,
    pub bot_token: String,
    /// 交接频道的 incoming webhook
    pub webhook_url: String,
    /// 频道链接前缀，频道ID直接拼接在后面
    pub channel_url_base: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://slack.com/api".to_string(),
            bot_token: String::new(),
            webhook_url: String::new(),
            channel_url_base: String::new(),
        }
    }
}

impl ChatConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bot_token.is_empty() {
            return Err(anyhow::anyhow!("缺少聊天平台令牌 (chat.bot_token)"));
        }

        if self.webhook_url.is_empty() {
            return Err(anyhow::anyhow!("缺少交接频道 webhook (chat.webhook_url)"));
        }

        if self.channel_url_base.is_empty() {
            return Err(anyhow::anyhow!("缺少频道链接前缀 (chat.channel_url_base)"));
        }

        Ok(())
    }
}
