use handover_core::{HandoverError, HandoverResult};

use crate::line_item::LineItem;
use crate::template::LineTemplate;

/// 定时消息与工单描述中摘要的最大字符数
pub const DEFAULT_MAX_ITEM_LEN: usize = 85;
/// 按需报告视图中摘要的最大字符数
pub const ON_DEMAND_MAX_ITEM_LEN: usize = 200;

/// 报告中的一个分组
///
/// 条目保持数据源返回的顺序，渲染不会修改分组本身。
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    heading: String,
    items: Vec<LineItem>,
    template: LineTemplate,
    message_if_none: String,
    show_count: bool,
}

impl Section {
    pub fn new(heading: impl Into<String>, template: LineTemplate, items: Vec<LineItem>) -> Self {
        Self {
            heading: heading.into(),
            items,
            template,
            message_if_none: String::new(),
            show_count: true,
        }
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.message_if_none = message.into();
        self
    }

    pub fn with_show_count(mut self, show_count: bool) -> Self {
        self.show_count = show_count;
        self
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 渲染为文本。`for_chat` 为真时条目标题渲染为可点击链接。
    pub fn render(&self, for_chat: bool, max_item_len: usize) -> HandoverResult<String> {
        let mut out = String::new();

        if !self.heading.is_empty() {
            out.push('*');
            out.push_str(&self.heading);
            if self.show_count {
                out.push_str(&format!(" ({})", self.items.len()));
            }
            out.push_str(":*");
        }

        out.push_str("\n\n");

        if self.items.is_empty() && !self.message_if_none.is_empty() {
            out.push('_');
            out.push_str(&self.message_if_none);
            out.push_str("_\n");
            return Ok(out);
        }

        for item in &self.items {
            let title = self.template.render(item)?;
            if for_chat {
                let link = item.value("link").ok_or_else(|| HandoverError::MissingField {
                    field: "link".to_string(),
                    template: self.template.source().to_string(),
                })?;
                out.push_str(&format!("<{link}|{title}>"));
            } else {
                out.push_str(&title);
            }
            out.push('\n');
            out.push_str(&truncate_chars(item.value("summary").unwrap_or_default(), max_item_len));
            out.push_str("\n\n");
        }

        Ok(out)
    }
}

/// 按字符数截断，不考虑单词边界
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> LineTemplate {
        LineTemplate::parse("*{key} — Created: {created}*").unwrap()
    }

    fn item(key: &str, summary: &str) -> LineItem {
        LineItem::new()
            .with("key", key)
            .with("created", "2024-03-01")
            .with("summary", summary)
            .with("link", format!("https://tracker.example.net/browse/{key}"))
    }

    #[test]
    fn test_empty_section_with_message() {
        let section = Section::new("Open Handover Issues", template(), vec![])
            .with_empty_message("No open handover issues.");

        let rendered = section.render(false, DEFAULT_MAX_ITEM_LEN).unwrap();
        assert_eq!(rendered, "*Open Handover Issues (0):*\n\n_No open handover issues._\n");
        let lines: Vec<&str> = rendered.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["*Open Handover Issues (0):*", "_No open handover issues._"]);
    }

    #[test]
    fn test_empty_section_without_message_is_heading_only() {
        let section = Section::new("Open NOC Channels", template(), vec![]);
        assert_eq!(section.render(true, 85).unwrap(), "*Open NOC Channels (0):*\n\n");

        let bare = Section::new("", template(), vec![]);
        assert_eq!(bare.render(true, 85).unwrap().trim(), "");
    }

    #[test]
    fn test_count_in_heading() {
        let section = Section::new(
            "Outstanding Incidents",
            template(),
            vec![item("NOC-1", "a"), item("NOC-2", "b"), item("NOC-3", "c")],
        );
        let rendered = section.render(false, 85).unwrap();
        assert!(rendered.starts_with("*Outstanding Incidents (3):*"));

        let hidden = section.clone().with_show_count(false);
        assert!(hidden.render(false, 85).unwrap().starts_with("*Outstanding Incidents:*"));
    }

    #[test]
    fn test_items_render_in_source_order() {
        let section = Section::new(
            "Recent",
            template(),
            vec![item("NOC-9", "first"), item("NOC-2", "second")],
        );
        let rendered = section.render(false, 85).unwrap();
        assert_eq!(
            rendered,
            "*Recent (2):*\n\n\
             *NOC-9 — Created: 2024-03-01*\nfirst\n\n\
             *NOC-2 — Created: 2024-03-01*\nsecond\n\n"
        );
    }

    #[test]
    fn test_chat_rendering_wraps_title_in_link() {
        let section = Section::new("Recent", template(), vec![item("NOC-9", "first")]);
        let rendered = section.render(true, 85).unwrap();
        assert!(rendered.contains(
            "<https://tracker.example.net/browse/NOC-9|*NOC-9 — Created: 2024-03-01*>\nfirst\n"
        ));
    }

    #[test]
    fn test_summary_truncated_by_characters() {
        let long = "é".repeat(120);
        let section = Section::new("Recent", template(), vec![item("NOC-1", &long)]);
        let rendered = section.render(false, 85).unwrap();
        let summary_line = rendered.lines().nth(3).unwrap();
        assert_eq!(summary_line.chars().count(), 85);

        let wide = section.render(false, 200).unwrap();
        assert_eq!(wide.lines().nth(3).unwrap().chars().count(), 120);
    }

    #[test]
    fn test_render_does_not_mutate_section() {
        let section = Section::new("Recent", template(), vec![item("NOC-1", "x")]);
        let before = section.clone();
        section.render(true, 10).unwrap();
        section.render(false, 10).unwrap();
        assert_eq!(section, before);
    }

    #[test]
    fn test_chat_rendering_requires_link() {
        let no_link = LineItem::new()
            .with("key", "NOC-1")
            .with("created", "2024-03-01")
            .with("summary", "x");
        let section = Section::new("Recent", template(), vec![no_link]);
        assert!(section.render(false, 85).is_ok());
        assert!(section.render(true, 85).is_err());
    }
}
