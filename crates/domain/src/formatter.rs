//! 消息格式化
//!
//! 聊天平台对单个文本块有长度上限，因此每个分组的渲染结果按行贪心装箱成多个块，
//! 分组之间插入分隔线。工单描述没有这个限制，直接用纯文本分隔符拼接。

use handover_core::{Block, HandoverResult, HandoverTicket};

use crate::section::Section;

/// 单个文本块的最大字符数
pub const MAX_BLOCK_CHARS: usize = 3000;

const TICKET_SEPARATOR_DASHES: usize = 35;

/// 把一段文本按行装入文本块，单行永远不会被拆开
pub fn block_builder(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut lines: Vec<&str> = Vec::new();
    let mut joined_len = 0usize;

    for line in text.lines() {
        let line_len = line.chars().count();
        let candidate = if lines.is_empty() {
            line_len
        } else {
            joined_len + 1 + line_len
        };

        if !lines.is_empty() && candidate > MAX_BLOCK_CHARS {
            push_text_block(&mut blocks, &lines);
            lines.clear();
            joined_len = line_len;
        } else {
            joined_len = candidate;
        }
        lines.push(line);
    }

    push_text_block(&mut blocks, &lines);
    blocks
}

// 聊天平台拒绝空文本块
fn push_text_block(blocks: &mut Vec<Block>, lines: &[&str]) {
    let text = lines.join("\n");
    if !text.trim().is_empty() {
        blocks.push(Block::text(text));
    }
}

/// 把多段文本组装成消息块，段与段之间插入分隔线（最后一段之后不插入）
///
/// 没有产生任何文本块的段直接跳过，不会留下多余的分隔线。
pub fn msg_builder<S: AsRef<str>>(segments: &[S]) -> Vec<Block> {
    let mut blocks = Vec::new();

    for segment_blocks in segments
        .iter()
        .map(|segment| block_builder(segment.as_ref()))
        .filter(|segment_blocks| !segment_blocks.is_empty())
    {
        if !blocks.is_empty() {
            blocks.push(Block::divider());
        }
        blocks.extend(segment_blocks);
    }

    blocks
}

/// 渲染全部分组并组装为消息块
pub fn build_segments(
    sections: &[Section],
    for_chat: bool,
    max_item_len: usize,
) -> HandoverResult<Vec<Block>> {
    let segments = render_all(sections, for_chat, max_item_len)?;
    Ok(msg_builder(&segments))
}

pub fn render_all(
    sections: &[Section],
    for_chat: bool,
    max_item_len: usize,
) -> HandoverResult<Vec<String>> {
    sections
        .iter()
        .map(|s| s.render(for_chat, max_item_len))
        .collect()
}

pub fn ticket_separator() -> String {
    format!("{}\n\n", "—".repeat(TICKET_SEPARATOR_DASHES))
}

/// 工单描述：每个分组前加一条纯文本分隔符
pub fn ticket_description(sections: &[Section], max_item_len: usize) -> HandoverResult<String> {
    let separator = ticket_separator();
    let mut description = String::new();

    for section in sections {
        description.push_str(&separator);
        description.push_str(&section.render(false, max_item_len)?);
    }

    Ok(description)
}

/// 交接消息的首段：提醒全员并链接到交接工单
pub fn handover_header(ticket: &HandoverTicket, preface: &str) -> String {
    format!(
        "@here\n{preface}<{}|*{}*>",
        ticket.permalink, ticket.summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::LineItem;
    use crate::template::LineTemplate;

    fn texts(blocks: &[Block]) -> Vec<Option<&str>> {
        blocks.iter().map(|b| b.text_content()).collect()
    }

    #[test]
    fn test_single_long_line_is_never_split() {
        let line = "x".repeat(3500);
        let blocks = block_builder(&line);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text_content().unwrap().len(), 3500);
    }

    #[test]
    fn test_new_block_starts_at_line_crossing_threshold() {
        let first = "a".repeat(2000);
        let second = "b".repeat(1500);
        let third = "c".repeat(1000);
        let text = format!("{first}\n{second}\n{third}");

        let blocks = block_builder(&text);
        assert_eq!(
            texts(&blocks),
            vec![Some(first.as_str()), Some(format!("{second}\n{third}").as_str())]
        );
    }

    #[test]
    fn test_block_fills_up_to_threshold_exactly() {
        let first = "a".repeat(1999);
        let second = "b".repeat(1000);
        let text = format!("{first}\n{second}");
        let blocks = block_builder(&text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text_content().unwrap().chars().count(), MAX_BLOCK_CHARS);
    }

    #[test]
    fn test_no_block_exceeds_threshold_for_many_short_lines() {
        let text = (0..400)
            .map(|i| format!("line {i:04} {}", "z".repeat(40)))
            .collect::<Vec<_>>()
            .join("\n");
        let blocks = block_builder(&text);
        assert!(blocks.len() > 1);
        for block in &blocks {
            assert!(block.text_content().unwrap().chars().count() <= MAX_BLOCK_CHARS);
        }
        let rejoined: Vec<&str> = blocks.iter().filter_map(|b| b.text_content()).collect();
        assert_eq!(rejoined.join("\n"), text);
    }

    #[test]
    fn test_dividers_only_between_segments() {
        let big = (0..3).map(|_| "q".repeat(2000)).collect::<Vec<_>>().join("\n");
        let blocks = msg_builder(&[big.as_str(), "second section"]);

        let dividers: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_divider())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(blocks.len(), 5);
        assert_eq!(dividers, vec![3]);
        assert!(!blocks.last().unwrap().is_divider());
    }

    #[test]
    fn test_identical_segments_still_get_dividers() {
        let blocks = msg_builder(&["same", "same", "same"]);
        assert_eq!(blocks.iter().filter(|b| b.is_divider()).count(), 2);
    }

    #[test]
    fn test_blank_segments_leave_no_stray_dividers() {
        let blocks = msg_builder(&["\n\n", "first", "   \n", "\n\n", "second", ""]);
        assert_eq!(texts(&blocks), vec![Some("first"), None, Some("second")]);

        assert!(msg_builder(&["\n\n", " "]).is_empty());
    }

    #[test]
    fn test_build_segments_over_sections() {
        let template = LineTemplate::parse("*{key}*").unwrap();
        let item = LineItem::new()
            .with("key", "NOC-1")
            .with("summary", "Core switch down")
            .with("link", "https://t/NOC-1");
        let sections = vec![
            Section::new("First", template.clone(), vec![item]),
            Section::new("Second", template, vec![]).with_empty_message("Nothing."),
        ];

        let blocks = build_segments(&sections, true, 85).unwrap();
        assert_eq!(
            texts(&blocks),
            vec![
                Some("*First (1):*\n\n<https://t/NOC-1|*NOC-1*>\nCore switch down\n"),
                None,
                Some("*Second (0):*\n\n_Nothing._"),
            ]
        );
    }

    #[test]
    fn test_ticket_description_prefixes_every_section() {
        let template = LineTemplate::parse("*{key}*").unwrap();
        let sections = vec![
            Section::new("A", template.clone(), vec![]).with_empty_message("none a"),
            Section::new("B", template, vec![]).with_empty_message("none b"),
        ];
        let description = ticket_description(&sections, 85).unwrap();
        let separator = ticket_separator();

        assert!(description.starts_with(&separator));
        assert_eq!(description.matches(separator.as_str()).count(), 2);
        assert!(description.contains("*A (0):*\n\n_none a_\n"));
        assert!(!description.contains('<'));
    }

    #[test]
    fn test_handover_header() {
        let ticket = HandoverTicket {
            key: "NOC-500".to_string(),
            permalink: "https://t/browse/NOC-500".to_string(),
            summary: "Overnight NOC Handover 2024-03-01".to_string(),
        };
        assert_eq!(
            handover_header(&ticket, ""),
            "@here\n<https://t/browse/NOC-500|*Overnight NOC Handover 2024-03-01*>"
        );
        assert!(handover_header(&ticket, "*Good morning team!*\n").starts_with("@here\n*Good morning team!*\n<"));
    }
}
