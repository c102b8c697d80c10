use super::line_item::QuoteLine;
use super::pl::PlScenario;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// 销售策略 (E1–E5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    E1,
    E2,
    E3,
    E4,
    E5,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::E1 => "E1 - Póliza Anual",
            Strategy::E2 => "E2 - Extraordinario",
            Strategy::E3 => "E3 - Cliente Nuevo",
            Strategy::E4 => "E4 - Retardantes",
            Strategy::E5 => "E5 - Cedis",
        }
    }

    /// 可选站点数量上限：E5 (Cedis) 允许多选
    pub fn max_site_selection(self) -> usize {
        match self {
            Strategy::E5 => 200,
            _ => 1,
        }
    }
}

/// 报价草稿快照 (base64 JSON 保存在报价记录的单个文本字段中)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftState {
    #[serde(default = "PlScenario::year_one")]
    pub pl1: PlScenario,
    #[serde(default = "PlScenario::year_two")]
    pub pl2: PlScenario,
    #[serde(default)]
    pub selected_site_ids: IndexSet<String>,
    #[serde(default)]
    pub line_items: Vec<QuoteLine>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub need_id: String,
    #[serde(default)]
    pub need_name: String,
}

impl Default for DraftState {
    fn default() -> Self {
        Self {
            pl1: PlScenario::year_one(),
            pl2: PlScenario::year_two(),
            selected_site_ids: IndexSet::new(),
            line_items: Vec::new(),
            strategy: None,
            need_id: String::new(),
            need_name: String::new(),
        }
    }
}

/// 草稿恢复来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RestoreSource {
    Snapshot,
    BackendLines,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoredDraft {
    pub draft: DraftState,
    pub source: RestoreSource,
}
