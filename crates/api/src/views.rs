//! 按需报告弹窗的各个视图

use handover_core::{Block, ModalView};
use handover_domain::SELECTIONS;

pub const MODAL_TITLE: &str = "NOC Status On-Demand";
pub const CLOSE_TEXT: &str = "Close";
pub const PROMPT_TEXT: &str = "What would you like to view?";
pub const LOADING_TEXT: &str = "One moment while I cook that up for you...";
pub const ERROR_TEXT: &str =
    "*Sorry, that report could not be generated.*\n_Please try again in a few minutes._";

fn on_demand_view(blocks: Vec<Block>) -> ModalView {
    ModalView::new(MODAL_TITLE, CLOSE_TEXT, blocks)
}

/// 初始视图：提示语、分隔线，以及每个可选报告一个按钮
pub fn initial_view() -> ModalView {
    let mut blocks = vec![Block::text(PROMPT_TEXT), Block::divider()];
    blocks.extend(SELECTIONS.iter().map(|s| Block::button(s.text, s.value)));
    on_demand_view(blocks)
}

pub fn interim_view() -> ModalView {
    on_demand_view(vec![Block::text(LOADING_TEXT)])
}

pub fn final_view(blocks: Vec<Block>) -> ModalView {
    on_demand_view(blocks)
}

/// 后台渲染失败时替换加载中视图，错误详情只写日志
pub fn error_view() -> ModalView {
    on_demand_view(vec![Block::text(ERROR_TEXT)])
}
