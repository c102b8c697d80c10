use crate::error::ContractError;
use crate::models::amount::percent_of;
use crate::models::{ContractLine, ContractSections, ContractTotals, Frequency};
use bigdecimal::{BigDecimal, Zero};

/// 合同增值税率 16%
const CONTRACT_VAT_RATE: i32 = 16;

/// 合同管理：本地编辑服务行并生成合同文档链接
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDraft {
    pub record_id: String,
    pub lines: Vec<ContractLine>,
    pub sections: ContractSections,
    pub frequency: Frequency,
}

impl ContractDraft {
    pub fn new(record_id: impl Into<String>, lines: Vec<ContractLine>) -> Self {
        Self {
            record_id: record_id.into(),
            lines: lines
                .into_iter()
                .map(|line| ContractLine {
                    selected: true,
                    ..line
                })
                .collect(),
            sections: ContractSections::default(),
            frequency: Frequency::default(),
        }
    }

    pub fn toggle_line(&mut self, id: &str, selected: bool) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.selected = selected;
        }
    }

    pub fn remove_line(&mut self, index: usize) -> Result<ContractLine, ContractError> {
        if index >= self.lines.len() {
            return Err(ContractError::IndexOutOfRange(index));
        }
        let removed = self.lines.remove(index);
        tracing::info!("Contract {}: removed line {}", self.record_id, removed.id);
        Ok(removed)
    }

    /// 替换一行并按 数量 × 单价 重算行总价
    pub fn replace_line(&mut self, index: usize, edited: ContractLine) -> Result<(), ContractError> {
        let slot = self
            .lines
            .get_mut(index)
            .ok_or(ContractError::IndexOutOfRange(index))?;
        let total_price = &edited.quantity * &edited.unit_price;
        *slot = ContractLine {
            total_price,
            ..edited
        };
        Ok(())
    }

    /// 重置为默认章节
    pub fn reset_sections(&mut self) {
        self.sections = ContractSections::default();
    }

    pub fn totals(&self) -> ContractTotals {
        contract_totals(&self.lines)
    }

    pub fn document_url(&self, pdf_path: &str) -> Result<String, ContractError> {
        contract_url(pdf_path, &self.record_id, &self.lines, &self.sections, self.frequency)
    }
}

/// 合同合计：仅统计已选中的行
pub fn contract_totals(lines: &[ContractLine]) -> ContractTotals {
    let (subtotal, discount) = lines.iter().filter(|l| l.selected).fold(
        (BigDecimal::zero(), BigDecimal::zero()),
        |(subtotal, discount), line| {
            let base = &line.quantity * &line.unit_price;
            let line_discount = match &line.discount {
                Some(pct) if !pct.is_zero() => percent_of(&base, pct),
                _ => BigDecimal::zero(),
            };
            (subtotal + base, discount + line_discount)
        },
    );

    let net = &subtotal - &discount;
    let vat = percent_of(&net, &BigDecimal::from(CONTRACT_VAT_RATE));
    let total = &net + &vat;

    ContractTotals {
        subtotal,
        discount,
        vat,
        total,
    }
}

/// 合同文档链接
pub fn contract_url(
    pdf_path: &str,
    record_id: &str,
    lines: &[ContractLine],
    sections: &ContractSections,
    frequency: Frequency,
) -> Result<String, ContractError> {
    let selected: Vec<String> = lines
        .iter()
        .filter(|l| l.selected)
        .map(|l| urlencoding::encode(&l.id).into_owned())
        .collect();

    if selected.is_empty() {
        return Err(ContractError::NothingSelected);
    }

    let mut url = format!(
        "{}?id={}&selectedItems={}",
        pdf_path,
        urlencoding::encode(record_id),
        selected.join(",")
    );

    for (name, enabled) in sections.flags() {
        if enabled {
            url.push_str(&format!("&{}=true", name));
        }
    }

    if sections.annual_calendar {
        url.push_str(&format!("&frecuencia={}", frequency.code()));
    }

    tracing::info!("Contract {} document url built with {} lines", record_id, selected.len());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn line(id: &str, qty: &str, price: &str, discount: Option<&str>) -> ContractLine {
        ContractLine {
            id: id.to_string(),
            product_code: Some("FUM-01".into()),
            product_name: Some("Fumigación".into()),
            site: Some("Liverpool Polanco - CDMX".into()),
            description: String::new(),
            quantity: dec(qty),
            unit_price: dec(price),
            discount: discount.map(dec),
            total_price: &dec(qty) * &dec(price),
            selected: true,
        }
    }

    fn draft() -> ContractDraft {
        ContractDraft::new(
            "0Q0A",
            vec![
                line("L1", "2", "500", Some("10")),
                line("L2", "1", "1000", None),
                line("L3", "4", "25", None),
            ],
        )
    }

    #[test]
    fn test_totals_over_selected_lines() {
        let mut contract = draft();
        let totals = contract.totals();
        assert_eq!(totals.subtotal, dec("2100"));
        assert_eq!(totals.discount, dec("100"));
        assert_eq!(totals.vat, dec("320"));
        assert_eq!(totals.total, dec("2320"));

        contract.toggle_line("L2", false);
        let totals = contract.totals();
        assert_eq!(totals.subtotal, dec("1100"));
        assert_eq!(totals.total, dec("1160"));
    }

    #[test]
    fn test_replace_line_recomputes_total_price() {
        let mut contract = draft();
        let mut edited = contract.lines[2].clone();
        edited.quantity = dec("10");
        edited.total_price = dec("0");
        contract.replace_line(2, edited).unwrap();
        assert_eq!(contract.lines[2].total_price, dec("250"));

        assert_eq!(
            contract.replace_line(9, line("X", "1", "1", None)),
            Err(ContractError::IndexOutOfRange(9))
        );
    }

    #[test]
    fn test_remove_line() {
        let mut contract = draft();
        let removed = contract.remove_line(0).unwrap();
        assert_eq!(removed.id, "L1");
        assert_eq!(contract.lines.len(), 2);
        assert!(contract.remove_line(5).is_err());
    }

    #[test]
    fn test_url_with_default_sections() {
        let contract = draft();
        let url = contract.document_url("/apex/QuoteContractPDF").unwrap();
        assert_eq!(
            url,
            "/apex/QuoteContractPDF?id=0Q0A&selectedItems=L1,L2,L3\
             &legal_clauses=true&technical_summary=true&company_seal=true"
        );
    }

    #[test]
    fn test_url_with_calendar_frequency() {
        let mut contract = draft();
        contract.toggle_line("L1", false);
        contract.sections.annual_calendar = true;
        contract.sections.company_seal = false;
        contract.frequency = Frequency::Quincenal;
        let url = contract.document_url("/apex/QuoteContractPDF").unwrap();
        assert_eq!(
            url,
            "/apex/QuoteContractPDF?id=0Q0A&selectedItems=L2,L3\
             &legal_clauses=true&technical_summary=true&annual_calendar=true&frecuencia=quincenal"
        );
    }

    #[test]
    fn test_url_requires_selection() {
        let mut contract = draft();
        for id in ["L1", "L2", "L3"] {
            contract.toggle_line(id, false);
        }
        assert_eq!(
            contract.document_url("/apex/QuoteContractPDF"),
            Err(ContractError::NothingSelected)
        );
    }

    #[test]
    fn test_reset_sections_and_labels() {
        let mut contract = draft();
        contract.sections.photo_gallery = true;
        contract.reset_sections();
        assert_eq!(contract.sections, ContractSections::default());
        assert_eq!(Frequency::Semanal.label(), "Semanal (52)");
        assert_eq!(contract.lines[1].discount_display(), "-");
        assert_eq!(contract.lines[0].discount_display(), "10%");
    }
}
