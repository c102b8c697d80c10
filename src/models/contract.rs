use super::amount::{lenient_decimal, lenient_decimal_opt};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 合同中的服务行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractLine {
    pub id: String,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "lenient_decimal")]
    pub quantity: BigDecimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub unit_price: BigDecimal,
    /// 百分比折扣
    #[serde(default, deserialize_with = "lenient_decimal_opt")]
    pub discount: Option<BigDecimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub total_price: BigDecimal,
    #[serde(default = "selected_by_default")]
    pub selected: bool,
}

fn selected_by_default() -> bool {
    true
}

impl ContractLine {
    pub fn discount_display(&self) -> String {
        match &self.discount {
            Some(d) if *d != BigDecimal::from(0) => format!("{}%", d),
            _ => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTotals {
    pub subtotal: BigDecimal,
    pub discount: BigDecimal,
    pub vat: BigDecimal,
    pub total: BigDecimal,
}

/// 合同可选章节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractSections {
    pub legal_clauses: bool,
    pub confidentiality: bool,
    pub technical_summary: bool,
    pub photo_gallery: bool,
    pub annual_calendar: bool,
    pub tax_retentions: bool,
    pub company_seal: bool,
}

impl Default for ContractSections {
    fn default() -> Self {
        Self {
            legal_clauses: true,
            confidentiality: false,
            technical_summary: true,
            photo_gallery: false,
            annual_calendar: false,
            tax_retentions: false,
            company_seal: true,
        }
    }
}

impl ContractSections {
    /// 按 URL 参数顺序列出 (参数名, 是否启用)
    pub fn flags(&self) -> [(&'static str, bool); 7] {
        [
            ("legal_clauses", self.legal_clauses),
            ("confidentiality", self.confidentiality),
            ("technical_summary", self.technical_summary),
            ("photo_gallery", self.photo_gallery),
            ("annual_calendar", self.annual_calendar),
            ("tax_retentions", self.tax_retentions),
            ("company_seal", self.company_seal),
        ]
    }
}

/// 年度服务日历频率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Semanal,
    Quincenal,
    #[default]
    Mensual,
    Bimestral,
    Unico,
}

impl Frequency {
    pub fn code(self) -> &'static str {
        match self {
            Frequency::Semanal => "semanal",
            Frequency::Quincenal => "quincenal",
            Frequency::Mensual => "mensual",
            Frequency::Bimestral => "bimestral",
            Frequency::Unico => "unico",
        }
    }

    /// 每年服务次数
    pub fn visits_per_year(self) -> u32 {
        match self {
            Frequency::Semanal => 52,
            Frequency::Quincenal => 24,
            Frequency::Mensual => 12,
            Frequency::Bimestral => 6,
            Frequency::Unico => 1,
        }
    }

    pub fn label(self) -> String {
        let name = match self {
            Frequency::Semanal => "Semanal",
            Frequency::Quincenal => "Quincenal",
            Frequency::Mensual => "Mensual",
            Frequency::Bimestral => "Bimestral",
            Frequency::Unico => "Único",
        };
        format!("{} ({})", name, self.visits_per_year())
    }
}
