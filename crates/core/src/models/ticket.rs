use serde::{Deserialize, Serialize};

/// 当前打开的交接工单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoverTicket {
    pub key: String,
    pub permalink: String,
    pub summary: String,
}
