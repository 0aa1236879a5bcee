//! 报告组件注册表
//!
//! 把可选择的报告名称映射到分组工厂参数，并定义完整交接报告的组件顺序。

use handover_core::{HandoverError, HandoverResult};

/// 完整交接报告的伪组件名
pub const FULL_HANDOVER: &str = "full_ho";
/// 待跟进组件名
pub const FOLLOWUP_COMPONENT: &str = "followup_issues";

const HANDOVER_QUERY: &str =
    r#"project = NOC AND type = Story AND summary ~ "NOC Handover" AND status != Done"#;
const RECENT_CR_QUERY: &str =
    r#"project = NOC AND type = "Change Record" AND created > "-24h""#;
const RECENT_P1_QUERY: &str = r#"project = NOC AND (type = Incident or type = "Platform Partner Outage") AND priority = 1 AND created > "-36h""#;
const OPEN_ISSUES_QUERY: &str = r#"project = NOC AND (type = Incident or type = "Platform Partner Outage") AND status != Closed ORDER by priority DESC, key DESC"#;
const SUBTASKS_QUERY: &str =
    "project = NOC AND issuetype = sub-task AND status != Done ORDER by due ASC";
const ACTION_ITEMS_QUERY: &str =
    r#"project = NOC AND issuetype = "NOC Action Item" AND status != Done ORDER by due ASC"#;
const ALL_P1_QUERY: &str =
    r#"project = NOC AND (type = Incident or type = "Platform Partner Outage") AND priority = 1"#;

const SHORT_FORMAT: &str = "*{key} — Created: {created}*";
const LONG_FORMAT: &str = "*{key} — P{priority} — Last update: {updated}*";
const SUBTASK_FORMAT: &str = "*{key} — Parent: {parent_key} — Due: {due}*";
const ACTION_ITEM_FORMAT: &str = "*{key} — Due: {due}*";

/// 分组数据来源，每种来源只携带自己需要的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSource {
    IssueTracker {
        query: &'static str,
        only_followup: bool,
    },
    ChatPlatform {
        archived: bool,
    },
}

/// 静态组件配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    pub name: &'static str,
    pub heading: &'static str,
    pub line_format: &'static str,
    pub message_if_none: &'static str,
    pub show_count: bool,
    pub source: SectionSource,
}

const fn tracker(
    name: &'static str,
    heading: &'static str,
    query: &'static str,
    line_format: &'static str,
    message_if_none: &'static str,
) -> ComponentSpec {
    ComponentSpec {
        name,
        heading,
        line_format,
        message_if_none,
        show_count: true,
        source: SectionSource::IssueTracker {
            query,
            only_followup: false,
        },
    }
}

const fn channels(name: &'static str, heading: &'static str, archived: bool) -> ComponentSpec {
    ComponentSpec {
        name,
        heading,
        line_format: SHORT_FORMAT,
        message_if_none: "",
        show_count: true,
        source: SectionSource::ChatPlatform { archived },
    }
}

pub const COMPONENTS: [ComponentSpec; 10] = [
    tracker(
        "open_ho_issues",
        "Open Handover Issues",
        HANDOVER_QUERY,
        SHORT_FORMAT,
        "No open handover issues.",
    ),
    tracker(
        "recent_cr_issues",
        "Recent Change Records (-24hrs, any status)",
        RECENT_CR_QUERY,
        SHORT_FORMAT,
        "No recent CR issues.",
    ),
    tracker(
        "recent_outages",
        "Recent Outages (-36hrs, any status)",
        RECENT_P1_QUERY,
        LONG_FORMAT,
        "No recent outages (knock on wood).",
    ),
    tracker(
        "outstanding_incidents",
        "Outstanding Incidents",
        OPEN_ISSUES_QUERY,
        LONG_FORMAT,
        "No outstanding incidents. Woohoo!",
    ),
    tracker(
        "incident_subtasks",
        "Pending Sub-tasks",
        SUBTASKS_QUERY,
        SUBTASK_FORMAT,
        "No pending sub-tasks.",
    ),
    channels("open_channs", "Open NOC Channels", false),
    ComponentSpec {
        name: FOLLOWUP_COMPONENT,
        heading: "Issues that need to be followed up on",
        line_format: LONG_FORMAT,
        message_if_none: "No issues need to be followed up on right now.",
        show_count: true,
        source: SectionSource::IssueTracker {
            query: OPEN_ISSUES_QUERY,
            only_followup: true,
        },
    },
    // 以下仅用于按需报告
    tracker(
        "action_items",
        "NOC Action Items",
        ACTION_ITEMS_QUERY,
        ACTION_ITEM_FORMAT,
        "No action items found.",
    ),
    channels("archived_channs", "Archived NOC Channels", true),
    tracker(
        "all_p1",
        "All P1 Incidents",
        ALL_P1_QUERY,
        SHORT_FORMAT,
        "This should not be empty!",
    ),
];

/// 完整交接报告的组件及顺序
pub const HANDOVER_COMPONENTS: [&str; 6] = [
    "open_ho_issues",
    "recent_cr_issues",
    "recent_outages",
    "outstanding_incidents",
    "incident_subtasks",
    "open_channs",
];

/// 按需报告中可选择的项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub text: &'static str,
    pub value: &'static str,
}

pub const SELECTIONS: [Selection; 8] = [
    Selection { text: "All Open Issues (P2-P5)", value: "outstanding_incidents" },
    Selection { text: "Issues to follow up on (per SLAs)", value: FOLLOWUP_COMPONENT },
    Selection { text: "Pending Issue Tasks", value: "incident_subtasks" },
    Selection { text: "All P1 Incidents", value: "all_p1" },
    Selection { text: "NOC Action Items", value: "action_items" },
    Selection { text: "Full Handover", value: FULL_HANDOVER },
    Selection { text: "Open NOC Channels", value: "open_channs" },
    Selection { text: "Archived NOC Channels", value: "archived_channs" },
];

pub struct ComponentRegistry;

impl ComponentRegistry {
    pub fn component(name: &str) -> Option<&'static ComponentSpec> {
        COMPONENTS.iter().find(|c| c.name == name)
    }

    /// 完整交接报告的组件，按报告顺序排列
    pub fn handover_components() -> Vec<&'static ComponentSpec> {
        HANDOVER_COMPONENTS
            .iter()
            .filter_map(|name| Self::component(name))
            .collect()
    }

    /// 解析报告名称：`full_ho` 展开为完整交接报告，其余名称对应单个组件
    pub fn resolve(name: &str) -> HandoverResult<Vec<&'static ComponentSpec>> {
        if name == FULL_HANDOVER {
            return Ok(Self::handover_components());
        }

        Self::component(name)
            .map(|spec| vec![spec])
            .ok_or_else(|| HandoverError::UnknownComponent(name.to_string()))
    }

    pub fn is_known(name: &str) -> bool {
        name == FULL_HANDOVER || Self::component(name).is_some()
    }
}
