use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// 仅接受普通小数写法 (不接受科学计数法)
static PLAIN_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("static regex"));

/// 输入允许的最大数字位数
pub const MAX_DIGITS: usize = 256;

/// 百分比基数
pub fn hundred() -> BigDecimal {
    BigDecimal::from(100)
}

/// 解析用户输入的金额/百分比，无法解析时按 0 处理
/// 指数写法或位数过多同样按 0 处理
pub fn parse_decimal(raw: &str) -> BigDecimal {
    let raw = raw.trim();
    if raw.len() > MAX_DIGITS + 2 || !PLAIN_DECIMAL.is_match(raw) {
        return BigDecimal::zero();
    }
    BigDecimal::from_str(raw).unwrap_or_else(|_| BigDecimal::zero())
}

/// 解析数量 (非负整数)，小数部分截断，负数或非法输入按 0 处理
pub fn parse_quantity(raw: &str) -> u32 {
    parse_decimal(raw).to_u32().unwrap_or(0)
}

/// JSON 中的金额：字符串或数字
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl RawAmount {
    fn into_decimal(self) -> BigDecimal {
        match self {
            RawAmount::Int(v) => BigDecimal::from(v),
            RawAmount::UInt(v) => BigDecimal::from(v),
            RawAmount::Float(v) => parse_decimal(&v.to_string()),
            RawAmount::Text(v) => parse_decimal(&v),
        }
    }
}

/// serde: 宽松解析金额，非法值按 0 处理
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawAmount::deserialize(deserializer)?.into_decimal())
}

pub fn lenient_decimal_opt<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawAmount>::deserialize(deserializer)?.map(RawAmount::into_decimal))
}

/// serde: 数量可能以 2.00 或 "2" 形式出现
pub fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_decimal(deserializer)?.to_u32().unwrap_or(0))
}

/// base × pct / 100
pub fn percent_of(base: &BigDecimal, pct: &BigDecimal) -> BigDecimal {
    base * pct / hundred()
}

/// 展示用金额：保留两位小数
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.round(2).with_scale(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_coerces_garbage_to_zero() {
        assert_eq!(parse_decimal("12.5"), BigDecimal::from_str("12.5").unwrap());
        assert_eq!(parse_decimal(" 7 "), BigDecimal::from(7));
        assert_eq!(parse_decimal("abc"), BigDecimal::zero());
        assert_eq!(parse_decimal(""), BigDecimal::zero());
    }

    #[test]
    fn test_parse_decimal_rejects_exponent_forms() {
        assert_eq!(parse_decimal("1e-9223372036854775808"), BigDecimal::zero());
        assert_eq!(parse_decimal("1e400000000"), BigDecimal::zero());
        assert_eq!(parse_decimal("2E3"), BigDecimal::zero());
        assert_eq!(parse_decimal(&"9".repeat(MAX_DIGITS + 1)), BigDecimal::zero());
        assert_eq!(round_money(&parse_decimal("1e400000000")).to_string(), "0.00");
        assert_eq!(parse_decimal("-0.5"), BigDecimal::from_str("-0.5").unwrap());
        assert_eq!(parse_decimal(".25"), BigDecimal::from_str("0.25").unwrap());
    }

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "lenient_decimal")]
        amount: BigDecimal,
        #[serde(default, deserialize_with = "lenient_decimal_opt")]
        discount: Option<BigDecimal>,
        #[serde(deserialize_with = "lenient_quantity")]
        quantity: u32,
    }

    #[test]
    fn test_lenient_deserializers() {
        let sample: Sample =
            serde_json::from_str(r#"{"amount":"1e-9223372036854775808","quantity":2.00}"#).unwrap();
        assert_eq!(sample.amount, BigDecimal::zero());
        assert_eq!(sample.discount, None);
        assert_eq!(sample.quantity, 2);

        let sample: Sample =
            serde_json::from_str(r#"{"amount":12.5,"discount":"10","quantity":"3"}"#).unwrap();
        assert_eq!(sample.amount, BigDecimal::from_str("12.5").unwrap());
        assert_eq!(sample.discount, Some(BigDecimal::from(10)));
        assert_eq!(sample.quantity, 3);

        let sample: Sample =
            serde_json::from_str(r#"{"amount":"1e400000000","discount":null,"quantity":-1}"#).unwrap();
        assert_eq!(sample.amount, BigDecimal::zero());
        assert_eq!(sample.discount, None);
        assert_eq!(sample.quantity, 0);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity("2.9"), 2);
        assert_eq!(parse_quantity("-4"), 0);
        assert_eq!(parse_quantity("x"), 0);
    }

    #[test]
    fn test_round_money_pads_and_rounds() {
        assert_eq!(round_money(&BigDecimal::from(50)).to_string(), "50.00");
        let third = BigDecimal::from(4000) / BigDecimal::from(3);
        assert_eq!(round_money(&third).to_string(), "1333.33");
    }
}
