use super::amount::{lenient_decimal, lenient_decimal_opt, lenient_quantity};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 客户站点/联系人 (来自后端)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContact {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mailing_street: Option<String>,
    #[serde(default)]
    pub mailing_city: Option<String>,
    #[serde(default)]
    pub mailing_state: Option<String>,
    /// 内部编码 CON-101, CON-102 ...
    #[serde(default)]
    pub internal_code: String,
}

impl SiteContact {
    /// 补全缺省字段并分配内部编码
    pub fn normalized(mut self, index: usize) -> Self {
        self.internal_code = format!("CON-{}", index + 101);
        self.account_name.get_or_insert_with(|| "Sin Cuenta".to_string());
        self.mailing_street.get_or_insert_with(|| "Sin calle".to_string());
        self.mailing_city.get_or_insert_with(|| "N/A".to_string());
        self.mailing_state.get_or_insert_with(|| "N/A".to_string());
        self
    }

    /// "账户名 - 城市"
    pub fn display_label(&self) -> String {
        format!(
            "{} - {}",
            self.account_name.as_deref().unwrap_or("Sede"),
            self.mailing_city.as_deref().unwrap_or("")
        )
    }
}

/// 报价记录中已保存的原始明细行 (快照损坏时的回退来源)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendLineRecord {
    pub id: String,
    #[serde(default)]
    pub pricebook_entry_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(deserialize_with = "lenient_decimal")]
    pub unit_price: BigDecimal,
    #[serde(default, deserialize_with = "lenient_decimal_opt")]
    pub discount: Option<BigDecimal>,
    #[serde(default, deserialize_with = "lenient_decimal_opt")]
    pub total_price: Option<BigDecimal>,
}

/// 报价记录头部
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub introduction_text: Option<String>,
    #[serde(default)]
    pub quote_number: Option<String>,
    #[serde(default)]
    pub warranty_text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub show_warranty: bool,
    #[serde(default)]
    pub account_name: Option<String>,
    /// ISO 时间戳，例如 2024-05-01T10:00:00.000Z
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub business_lines_selected: Option<String>,
    #[serde(default)]
    pub markers_data: Option<String>,
    #[serde(default)]
    pub line_items: Vec<BackendLineRecord>,
    #[serde(default)]
    pub technical_sites: Option<String>,
}

/// 编辑器初始化数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialData {
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub quote: Option<QuoteRecord>,
    #[serde(default)]
    pub contacts: Vec<SiteContact>,
}

/// 产品搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub unit_price: BigDecimal,
}

/// 商机需求搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedHit {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStatus {
    Draft,
    Presented,
}

/// 保存请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub quote_id: Option<String>,
    pub account_id: Option<String>,
    pub contact_id: Option<String>,
    pub name: String,
    pub status: QuoteStatus,
    pub intro: String,
    pub warranty: String,
    pub business_lines: String,
    pub technical_sites: String,
    /// 报价行 JSON
    pub line_items: String,
    pub show_intro: bool,
    pub show_warranty: bool,
    pub payment_notes: String,
    pub pay_transfer: bool,
    pub pay_card: bool,
    pub product_sale: bool,
    /// base64 草稿快照
    pub markers_data: String,
}
