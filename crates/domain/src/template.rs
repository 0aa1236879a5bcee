//! 行标题模板
//!
//! 语法：`{field}` 引用条目字段，`{{` 与 `}}` 输出字面量花括号。
//! 引用不存在的字段在渲染时报错；字段存在但未设置时输出 `None`。

use handover_core::{HandoverError, HandoverResult};

use crate::line_item::LineItem;

/// 未设置字段的渲染结果
pub const NULL_FIELD: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl LineTemplate {
    pub fn parse(source: &str) -> HandoverResult<Self> {
        let invalid = |message: &str| HandoverError::InvalidTemplate {
            template: source.to_string(),
            message: message.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(invalid("字段名中出现 '{'")),
                            Some(ch) => name.push(ch),
                            None => return Err(invalid("缺少 '}'")),
                        }
                    }
                    if name.is_empty() {
                        return Err(invalid("字段名为空"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' => return Err(invalid("单独出现的 '}'")),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// 模板是否引用了指定字段
    pub fn references(&self, field: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Field(name) if name == field))
    }

    pub fn render(&self, item: &LineItem) -> HandoverResult<String> {
        let mut out = String::with_capacity(self.source.len() + 32);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => match item.field(name) {
                    Some(Some(value)) => out.push_str(value),
                    Some(None) => out.push_str(NULL_FIELD),
                    None => {
                        return Err(HandoverError::MissingField {
                            field: name.clone(),
                            template: self.source.clone(),
                        })
                    }
                },
            }
        }

        Ok(out)
    }
}
