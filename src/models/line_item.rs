use super::amount::{hundred, lenient_decimal, lenient_quantity, round_money};
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// 价格录入方式：单价 或 总价
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryMode {
    #[default]
    UnitPrice,
    TotalPrice,
}

/// 折扣类型：固定金额 或 百分比
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountKind {
    #[default]
    Fixed,
    Percentage,
}

impl DiscountKind {
    pub fn toggled(self) -> Self {
        match self {
            DiscountKind::Fixed => DiscountKind::Percentage,
            DiscountKind::Percentage => DiscountKind::Fixed,
        }
    }
}

/// 添加服务弹窗中每个站点的一行输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLineInput {
    pub site_id: String,
    pub site_label: String,
    #[serde(deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(deserialize_with = "lenient_decimal")]
    pub amount: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub discount: BigDecimal,
    pub discount_kind: DiscountKind,
    #[serde(deserialize_with = "lenient_decimal")]
    pub tax_rate: BigDecimal,
    pub selected: bool,
    /// 派生字段，由定价计算器重算
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub net_subtotal: BigDecimal,
}

impl SiteLineInput {
    pub fn new(site_id: impl Into<String>, site_label: impl Into<String>, tax_rate: BigDecimal) -> Self {
        Self {
            site_id: site_id.into(),
            site_label: site_label.into(),
            quantity: 1,
            amount: BigDecimal::zero(),
            discount: BigDecimal::zero(),
            discount_kind: DiscountKind::Fixed,
            tax_rate,
            selected: true,
            net_subtotal: BigDecimal::zero(),
        }
    }

    /// 是否可以生成报价行 (已选中、数量和金额大于零)
    pub fn is_billable(&self) -> bool {
        self.selected && self.quantity > 0 && self.amount > BigDecimal::zero()
    }
}

/// 已定价的报价行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub id: String,
    pub product_id: String,
    pub description: String,
    /// 去除 HTML 标签后的技术说明，最多 255 个字符
    pub technical_detail: String,
    pub technical_detail_html: String,
    #[serde(default)]
    pub execution_notes: String,
    #[serde(default)]
    pub create_new_zones: bool,
    pub site_label: String,
    #[serde(deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(deserialize_with = "lenient_decimal")]
    pub unit_amount: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub discount: BigDecimal,
    pub discount_kind: DiscountKind,
    #[serde(deserialize_with = "lenient_decimal")]
    pub tax_rate: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub tax_amount: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub net_subtotal: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub gross_total: BigDecimal,
}

impl PricedLine {
    /// 折扣展示："10%"、"$50.00" 或 "-"
    pub fn discount_display(&self) -> String {
        if self.discount <= BigDecimal::zero() {
            return "-".to_string();
        }
        match self.discount_kind {
            DiscountKind::Percentage => format!("{}%", self.discount),
            DiscountKind::Fixed => format!("${}", round_money(&self.discount)),
        }
    }

    pub fn tax_label(&self) -> String {
        format!("{}%", self.tax_rate)
    }

    /// 折扣前金额 (数量 × 单价)
    pub fn base_amount(&self) -> BigDecimal {
        &self.unit_amount * BigDecimal::from(self.quantity)
    }

    /// 实际折扣金额，负值按 0 计
    pub fn discount_amount(&self) -> BigDecimal {
        let diff = self.base_amount() - &self.net_subtotal;
        if diff > BigDecimal::zero() {
            diff
        } else {
            BigDecimal::zero()
        }
    }
}

/// 分节标题 (不参与计价)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparatorLine {
    pub id: String,
    pub label: String,
}

/// 报价行：定价行 或 分节标题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QuoteLine {
    Priced(PricedLine),
    Separator(SeparatorLine),
}

impl QuoteLine {
    pub fn id(&self) -> &str {
        match self {
            QuoteLine::Priced(line) => &line.id,
            QuoteLine::Separator(sep) => &sep.id,
        }
    }

    /// 分节标题数量恒为 0
    pub fn quantity(&self) -> u32 {
        match self {
            QuoteLine::Priced(line) => line.quantity,
            QuoteLine::Separator(_) => 0,
        }
    }

    pub fn as_priced(&self) -> Option<&PricedLine> {
        match self {
            QuoteLine::Priced(line) => Some(line),
            QuoteLine::Separator(_) => None,
        }
    }
}

/// 报价汇总行 (基数、税额、预扣、合计)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub label: String,
    pub base: BigDecimal,
    pub tax: BigDecimal,
    pub retentions: BigDecimal,
    pub total: BigDecimal,
}

/// 默认增值税率 16%
pub fn default_tax_rate() -> BigDecimal {
    BigDecimal::from(16)
}

/// 税率换算为系数 (16 -> 0.16)
pub fn tax_factor(rate: &BigDecimal) -> BigDecimal {
    rate / hundred()
}
