//! 交接报告领域逻辑：待跟进判定、条目模板、分组渲染、组件注册表与消息格式化

pub mod factory;
pub mod followup;
pub mod formatter;
pub mod line_item;
pub mod registry;
pub mod section;
pub mod template;

pub use factory::{channel_is_relevant, SectionFactory};
pub use followup::{filter_followup, filter_followup_at, needs_followup, FollowupCandidate};
pub use formatter::{
    block_builder, build_segments, handover_header, msg_builder, ticket_description,
    MAX_BLOCK_CHARS,
};
pub use line_item::LineItem;
pub use registry::{ComponentRegistry, ComponentSpec, Selection, SectionSource, FULL_HANDOVER, SELECTIONS};
pub use section::{Section, DEFAULT_MAX_ITEM_LEN, ON_DEMAND_MAX_ITEM_LEN};
pub use template::LineTemplate;
