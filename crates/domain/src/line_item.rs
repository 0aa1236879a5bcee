use std::collections::BTreeMap;

/// 一条可展示的报告条目（工单或频道）
///
/// 字段集合由产生它的工厂决定；值为 `None` 表示字段存在但未设置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItem {
    fields: BTreeMap<String, Option<String>>,
}

impl LineItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), Some(value.into()));
        self
    }

    pub fn with_optional(mut self, name: &str, value: Option<String>) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// 字段不存在时返回 `None`；存在但未设置时返回 `Some(None)`
    pub fn field(&self, name: &str) -> Option<Option<&str>> {
        self.fields.get(name).map(|v| v.as_deref())
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).flatten()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}
