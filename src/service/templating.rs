use crate::models::Strategy;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

/// 技术说明纯文本最大长度
pub const DETAIL_MAX_CHARS: usize = 255;

/// 未填写的签名/名称占位
pub const BLANK: &str = "________________";

/// 去除 HTML 标签
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// 去除 HTML 标签并截断到 255 个字符
pub fn plain_detail(html: &str) -> String {
    strip_html(html).chars().take(DETAIL_MAX_CHARS).collect()
}

/// 替换模板中的动态标记 (联系人 / 客户账户)
pub fn merge_dynamic_tags(text: &str, contact: &str, account: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.replace("[[CONTACTO]]", contact)
        .replace("[[CUENTA]]", account)
        .replace("{!Contact.Name}", contact)
        .replace("{!Quote.Account}", account)
}

/// 主题自动填充："{策略} @ {需求}"
pub fn auto_subject(strategy: Option<Strategy>, need_name: &str) -> String {
    let label = strategy.map(Strategy::label).unwrap_or("");
    let need = if need_name.is_empty() {
        "Servicio Técnico"
    } else {
        need_name
    };
    format!("{} @ {}", label, need)
}

/// 主题是否仍可被自动覆盖
pub fn subject_is_automatic(subject: &str) -> bool {
    subject.is_empty() || subject.contains('@') || subject == "Cargando..."
}

/// dd/mm/yyyy
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// 解析后端时间戳的日期部分 (2024-05-01T10:00:00.000Z)
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// 以 sep 连接非空选项，全部为空时返回 "No especificado"
pub fn join_or_unspecified(parts: &[&str], sep: &str) -> String {
    if parts.is_empty() {
        "No especificado".to_string()
    } else {
        parts.join(sep)
    }
}
