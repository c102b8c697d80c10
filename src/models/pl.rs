use super::amount::{lenient_decimal, round_money};
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// 损益测算场景 (第一年 / 第二年)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlScenario {
    #[serde(deserialize_with = "lenient_decimal")]
    pub cost: BigDecimal,
    /// 目标毛利率 (%)
    #[serde(deserialize_with = "lenient_decimal")]
    pub margin: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub indirect: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub commission1: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub commission2: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub royalty: BigDecimal,
    /// 融资天数
    #[serde(deserialize_with = "lenient_decimal")]
    pub days: BigDecimal,
}

impl PlScenario {
    fn with_margin(margin: i32) -> Self {
        Self {
            cost: BigDecimal::zero(),
            margin: BigDecimal::from(margin),
            indirect: BigDecimal::from(15),
            commission1: BigDecimal::from(2),
            commission2: BigDecimal::zero(),
            royalty: BigDecimal::from(5),
            days: BigDecimal::from(7),
        }
    }

    pub fn year_one() -> Self {
        Self::with_margin(25)
    }

    pub fn year_two() -> Self {
        Self::with_margin(41)
    }

    /// 按字段名更新单个输入
    pub fn with_field(&self, field: PlField, value: BigDecimal) -> Self {
        let mut next = self.clone();
        match field {
            PlField::Cost => next.cost = value,
            PlField::Margin => next.margin = value,
            PlField::Indirect => next.indirect = value,
            PlField::Commission1 => next.commission1 = value,
            PlField::Commission2 => next.commission2 = value,
            PlField::Royalty => next.royalty = value,
            PlField::Days => next.days = value,
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlField {
    Cost,
    Margin,
    Indirect,
    Commission1,
    Commission2,
    Royalty,
    Days,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlYear {
    One,
    Two,
}

/// 损益测算结果 (全精度)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlResult {
    pub sale_price: BigDecimal,
    pub indirect: BigDecimal,
    pub commission1: BigDecimal,
    pub commission2: BigDecimal,
    pub royalty: BigDecimal,
    pub financing: BigDecimal,
    pub profit_tax: BigDecimal,
    pub profit_share: BigDecimal,
    pub total_cost: BigDecimal,
    pub margin_amount: BigDecimal,
    pub margin_pct: BigDecimal,
}

impl PlResult {
    /// 展示用：所有字段保留两位小数
    pub fn rounded(&self) -> Self {
        Self {
            sale_price: round_money(&self.sale_price),
            indirect: round_money(&self.indirect),
            commission1: round_money(&self.commission1),
            commission2: round_money(&self.commission2),
            royalty: round_money(&self.royalty),
            financing: round_money(&self.financing),
            profit_tax: round_money(&self.profit_tax),
            profit_share: round_money(&self.profit_share),
            total_cost: round_money(&self.total_cost),
            margin_amount: round_money(&self.margin_amount),
            margin_pct: round_money(&self.margin_pct),
        }
    }
}

/// 两个场景并排对比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlComparison {
    pub year_one: PlResult,
    pub year_two: PlResult,
}

/// 毛利率区间 (用于提示颜色)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarginBand {
    Loss,
    Thin,
    Healthy,
}
