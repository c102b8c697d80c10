use super::editor::DisplayOptions;
use super::line_item::{PricedLine, QuoteTotals};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 打印页
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 页码 (从 1 开始)
    pub number: usize,
    /// 分节标题 (来自前一个分隔行)
    pub title: Option<String>,
    pub items: Vec<PricedLine>,
    /// 首页：渲染引言与抬头
    pub is_header: bool,
    /// 末页：渲染合计与签名
    pub is_terminal: bool,
}

/// 每页空间预算 (单位为估算的"点")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBudget {
    pub capacity: u32,
    pub header_cost: u32,
    pub item_cost: u32,
    pub long_detail_extra: u32,
    /// 超过该字符数的 HTML 说明视为长说明
    pub long_detail_threshold: usize,
}

impl Default for PageBudget {
    fn default() -> Self {
        Self {
            capacity: 22,
            header_cost: 10,
            item_cost: 2,
            long_detail_extra: 2,
            long_detail_threshold: 150,
        }
    }
}

impl PageBudget {
    /// 当前页可用空间
    pub fn limit(&self, header_page: bool) -> u32 {
        if header_page {
            self.capacity.saturating_sub(self.header_cost)
        } else {
            self.capacity
        }
    }

    /// 定价行占用空间
    pub fn cost_of(&self, line: &PricedLine) -> u32 {
        if line.technical_detail_html.chars().count() > self.long_detail_threshold {
            self.item_cost + self.long_detail_extra
        } else {
            self.item_cost
        }
    }
}

/// 打印视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub subject: String,
    pub folio: String,
    pub client_name: String,
    pub agent_name: String,
    /// dd/mm/yyyy
    pub date: String,
    pub approved_on: Option<String>,
    pub intro: String,
    pub warranty: String,
    pub payment_notes: String,
    pub sites: String,
    pub pages: Vec<Page>,
    pub totals: QuoteTotals,
    pub total_discount: BigDecimal,
    pub payment_methods: String,
    pub work_types: String,
    pub display: DisplayOptions,
}
