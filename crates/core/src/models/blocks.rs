//! 聊天平台消息块与模态视图
//!
//! 序列化结果与 Block Kit 的 JSON 结构一致，可直接作为 `blocks` / `view` 字段发送。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    Mrkdwn {
        text: String,
    },
    PlainText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText {
            text: text.into(),
            emoji: None,
        }
    }

    pub fn plain_emoji(text: impl Into<String>) -> Self {
        TextObject::PlainText {
            text: text.into(),
            emoji: Some(true),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TextObject::Mrkdwn { text } | TextObject::PlainText { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Button { text: TextObject, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: TextObject,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
    Divider,
}

impl Block {
    /// mrkdwn 文本块
    pub fn text(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
            accessory: None,
        }
    }

    /// 带 "View" 按钮的文本块，按钮值即报告名称
    pub fn button(text: impl Into<String>, value: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
            accessory: Some(Accessory::Button {
                text: TextObject::plain_emoji("View"),
                value: value.into(),
            }),
        }
    }

    pub fn divider() -> Self {
        Block::Divider
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Block::Divider)
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Block::Section { text, .. } => Some(text.text()),
            Block::Divider => None,
        }
    }
}

fn modal_kind() -> String {
    "modal".to_string()
}

/// 模态视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalView {
    #[serde(rename = "type", default = "modal_kind")]
    pub kind: String,
    pub title: TextObject,
    pub close: TextObject,
    pub blocks: Vec<Block>,
}

impl ModalView {
    pub fn new(title: &str, close: &str, blocks: Vec<Block>) -> Self {
        Self {
            kind: modal_kind(),
            title: TextObject::plain(title),
            close: TextObject::plain_emoji(close),
            blocks,
        }
    }
}
