use crate::models::amount::{hundred, percent_of};
use crate::models::line_item::tax_factor;
use crate::models::{DiscountKind, EntryMode, PricedLine, QuoteLine, QuoteTotals, SiteLineInput};
use bigdecimal::{BigDecimal, Zero};

/// 折扣前金额
pub fn base_amount(quantity: u32, entered: &BigDecimal, mode: EntryMode) -> BigDecimal {
    match mode {
        EntryMode::UnitPrice => entered * BigDecimal::from(quantity),
        EntryMode::TotalPrice => entered.clone(),
    }
}

/// 计算行净额 (不含税)
/// 固定折扣可能得到负数，不做下限截断
pub fn compute_line_total(
    quantity: u32,
    entered: &BigDecimal,
    mode: EntryMode,
    discount: &BigDecimal,
    kind: DiscountKind,
) -> BigDecimal {
    let base = base_amount(quantity, entered, mode);
    match kind {
        DiscountKind::Fixed => base - discount,
        DiscountKind::Percentage => &base * (BigDecimal::from(1) - discount / hundred()),
    }
}

/// 保存到报价行上的单价：总价模式下按数量平摊，数量为 0 时为 0
pub fn effective_unit_amount(quantity: u32, entered: &BigDecimal, mode: EntryMode) -> BigDecimal {
    match mode {
        EntryMode::UnitPrice => entered.clone(),
        EntryMode::TotalPrice if quantity == 0 => BigDecimal::zero(),
        EntryMode::TotalPrice => entered / BigDecimal::from(quantity),
    }
}

pub fn tax_amount(net: &BigDecimal, tax_rate: &BigDecimal) -> BigDecimal {
    percent_of(net, tax_rate)
}

/// 重新计算弹窗行的净额 (完整重算，不做增量修补)
pub fn recalculate_row(row: &SiteLineInput, mode: EntryMode) -> SiteLineInput {
    SiteLineInput {
        net_subtotal: compute_line_total(
            row.quantity,
            &row.amount,
            mode,
            &row.discount,
            row.discount_kind,
        ),
        ..row.clone()
    }
}

pub fn recalculate_rows(rows: &[SiteLineInput], mode: EntryMode) -> Vec<SiteLineInput> {
    rows.iter().map(|row| recalculate_row(row, mode)).collect()
}

/// 报价行的公共描述信息
#[derive(Debug, Clone)]
pub struct LineDescriptor<'a> {
    pub id: String,
    pub product_id: &'a str,
    pub product_name: &'a str,
    pub technical_detail: String,
    pub technical_detail_html: &'a str,
    pub execution_notes: String,
    pub create_new_zones: bool,
}

/// 由弹窗行生成报价行
pub fn price_line(desc: LineDescriptor<'_>, row: &SiteLineInput, mode: EntryMode) -> PricedLine {
    let net = compute_line_total(row.quantity, &row.amount, mode, &row.discount, row.discount_kind);
    let tax = tax_amount(&net, &row.tax_rate);
    let gross = &net + &tax;

    PricedLine {
        id: desc.id,
        product_id: desc.product_id.to_string(),
        description: format!("{} - {}", desc.product_name, row.site_label),
        technical_detail: desc.technical_detail,
        technical_detail_html: desc.technical_detail_html.to_string(),
        execution_notes: desc.execution_notes,
        create_new_zones: desc.create_new_zones,
        site_label: row.site_label.clone(),
        quantity: row.quantity,
        unit_amount: effective_unit_amount(row.quantity, &row.amount, mode),
        discount: row.discount.clone(),
        discount_kind: row.discount_kind,
        tax_rate: row.tax_rate.clone(),
        tax_amount: tax,
        net_subtotal: net,
        gross_total: gross,
    }
}

/// 汇总所有定价行 (分节标题不计入)
pub fn quote_totals(lines: &[QuoteLine], default_tax_rate: &BigDecimal) -> QuoteTotals {
    let label = format!("I.V.A. ({}%)", default_tax_rate);
    let (base, tax) = lines
        .iter()
        .filter_map(QuoteLine::as_priced)
        .fold((BigDecimal::zero(), BigDecimal::zero()), |(base, tax), line| {
            (base + &line.net_subtotal, tax + &line.tax_amount)
        });
    let total = &base + &tax;

    QuoteTotals {
        label,
        base,
        tax,
        retentions: BigDecimal::zero(),
        total,
    }
}

/// 全部折扣金额
pub fn total_discount(lines: &[QuoteLine]) -> BigDecimal {
    lines
        .iter()
        .filter_map(QuoteLine::as_priced)
        .fold(BigDecimal::zero(), |acc, line| acc + line.discount_amount())
}

pub fn has_any_discount(lines: &[QuoteLine]) -> bool {
    lines
        .iter()
        .filter_map(QuoteLine::as_priced)
        .any(|line| line.discount > BigDecimal::zero())
}

/// 含税合计
pub fn gross_with_rate(net: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    net + net * tax_factor(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn row(qty: u32, amount: &str, discount: &str, kind: DiscountKind) -> SiteLineInput {
        SiteLineInput {
            quantity: qty,
            amount: dec(amount),
            discount: dec(discount),
            discount_kind: kind,
            ..SiteLineInput::new("s1", "Sucursal Norte - Monterrey", dec("16"))
        }
    }

    fn descriptor(id: &str) -> LineDescriptor<'static> {
        LineDescriptor {
            id: id.to_string(),
            product_id: "P-1",
            product_name: "Fumigación",
            technical_detail: String::new(),
            technical_detail_html: "",
            execution_notes: String::new(),
            create_new_zones: false,
        }
    }

    #[test]
    fn test_unit_mode_fixed_discount() {
        let base = base_amount(3, &dec("100"), EntryMode::UnitPrice);
        assert_eq!(base, dec("300"));
        let net = compute_line_total(3, &dec("100"), EntryMode::UnitPrice, &dec("50"), DiscountKind::Fixed);
        assert_eq!(net, dec("250"));
    }

    #[test]
    fn test_total_mode_percentage_discount() {
        let base = base_amount(4, &dec("200"), EntryMode::TotalPrice);
        assert_eq!(base, dec("200"));
        let net = compute_line_total(
            4,
            &dec("200"),
            EntryMode::TotalPrice,
            &dec("10"),
            DiscountKind::Percentage,
        );
        assert_eq!(net, dec("180"));
    }

    #[test]
    fn test_fixed_discount_larger_than_base_goes_negative() {
        let net = compute_line_total(1, &dec("40"), EntryMode::UnitPrice, &dec("100"), DiscountKind::Fixed);
        assert_eq!(net, dec("-60"));
    }

    #[test]
    fn test_effective_unit_amount_total_mode_guards_zero_quantity() {
        assert_eq!(effective_unit_amount(4, &dec("200"), EntryMode::TotalPrice), dec("50"));
        assert_eq!(effective_unit_amount(0, &dec("200"), EntryMode::TotalPrice), BigDecimal::zero());
        assert_eq!(effective_unit_amount(0, &dec("200"), EntryMode::UnitPrice), dec("200"));
    }

    #[test]
    fn test_recalculate_row_is_full_recompute() {
        let mut r = row(2, "100", "10", DiscountKind::Percentage);
        r.net_subtotal = dec("999");
        let r = recalculate_row(&r, EntryMode::UnitPrice);
        assert_eq!(r.net_subtotal, dec("180"));

        let r = recalculate_row(&r, EntryMode::TotalPrice);
        assert_eq!(r.net_subtotal, dec("90"));
    }

    #[test]
    fn test_price_line_tax_and_gross() {
        let line = price_line(descriptor("P-1-s1-1"), &row(3, "100", "50", DiscountKind::Fixed), EntryMode::UnitPrice);
        assert_eq!(line.net_subtotal, dec("250"));
        assert_eq!(line.tax_amount, dec("40"));
        assert_eq!(line.gross_total, dec("290"));
        assert_eq!(line.description, "Fumigación - Sucursal Norte - Monterrey");
        assert_eq!(line.discount_display(), "$50.00");
        assert_eq!(line.tax_label(), "16%");
    }

    #[test]
    fn test_totals_skip_separators() {
        let a = price_line(descriptor("a"), &row(1, "100", "0", DiscountKind::Fixed), EntryMode::UnitPrice);
        let b = price_line(descriptor("b"), &row(2, "50", "10", DiscountKind::Percentage), EntryMode::UnitPrice);
        let lines = vec![
            QuoteLine::Priced(a),
            QuoteLine::Separator(crate::models::SeparatorLine {
                id: "sep-1".into(),
                label: "Área de cocina".into(),
            }),
            QuoteLine::Priced(b),
        ];

        let totals = quote_totals(&lines, &dec("16"));
        assert_eq!(totals.label, "I.V.A. (16%)");
        assert_eq!(totals.base, dec("190"));
        assert_eq!(totals.tax, dec("30.4"));
        assert_eq!(totals.retentions, BigDecimal::zero());
        assert_eq!(totals.total, dec("220.4"));

        assert_eq!(total_discount(&lines), dec("10"));
        assert!(has_any_discount(&lines));
    }

    #[test]
    fn test_gross_with_rate() {
        assert_eq!(gross_with_rate(&dec("100"), &dec("16")), dec("116"));
    }
}
