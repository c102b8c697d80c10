use crate::models::PageBudget;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 环境变量前缀，例如 TECH_QUOTE__SERVER__PORT=9090
pub const ENV_PREFIX: &str = "TECH_QUOTE";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pricing: PricingConfig,
    pub layout: PageBudget,
    pub contract: ContractConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// 默认税率 (%)
    pub default_tax_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// 合同 PDF 页面路径
    pub pdf_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            pricing: PricingConfig { default_tax_rate: 16 },
            layout: PageBudget::default(),
            contract: ContractConfig {
                pdf_path: "/apex/QuoteContractPDF".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 默认值 + 环境变量覆盖
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn default_tax_rate(&self) -> BigDecimal {
        BigDecimal::from(self.pricing.default_tax_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_overrides_matches_default() {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.contract.pdf_path, "/apex/QuoteContractPDF");
        assert_eq!(config.layout, PageBudget::default());
        assert_eq!(config.default_tax_rate(), BigDecimal::from(16));
    }
}
