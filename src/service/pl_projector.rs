use crate::models::amount::{hundred, percent_of};
use crate::models::{MarginBand, PlComparison, PlResult, PlScenario};
use bigdecimal::{BigDecimal, Zero};

/// 融资日利率 0.000611
fn daily_financing_rate() -> BigDecimal {
    BigDecimal::new(611.into(), 6)
}

/// 利润所得税 6%
fn profit_tax_rate() -> BigDecimal {
    BigDecimal::new(6.into(), 2)
}

/// 员工利润分成 5%
fn profit_share_rate() -> BigDecimal {
    BigDecimal::new(5.into(), 2)
}

/// 由成本和目标毛利率反推售价；毛利率 >= 100% 时售价为 0
pub fn implied_sale_price(cost: &BigDecimal, margin: &BigDecimal) -> BigDecimal {
    if *margin >= hundred() {
        return BigDecimal::zero();
    }
    let factor = BigDecimal::from(1) - margin / hundred();
    cost / factor
}

/// 损益测算 (全精度，展示时再取两位小数)
pub fn project(scenario: &PlScenario) -> PlResult {
    let sale = implied_sale_price(&scenario.cost, &scenario.margin);

    let indirect = percent_of(&sale, &scenario.indirect);
    let commission1 = percent_of(&sale, &scenario.commission1);
    let commission2 = percent_of(&sale, &scenario.commission2);
    let royalty = percent_of(&sale, &scenario.royalty);
    let financing = &sale * daily_financing_rate() * &scenario.days;

    let gross_profit =
        &sale - &scenario.cost - &indirect - &commission1 - &commission2 - &royalty - &financing;

    let (profit_tax, profit_share) = if gross_profit > BigDecimal::zero() {
        (
            &gross_profit * profit_tax_rate(),
            &gross_profit * profit_share_rate(),
        )
    } else {
        (BigDecimal::zero(), BigDecimal::zero())
    };

    let total_cost = &scenario.cost
        + &indirect
        + &commission1
        + &commission2
        + &royalty
        + &financing
        + &profit_tax
        + &profit_share;
    let margin_amount = &sale - &total_cost;
    let margin_pct = if sale > BigDecimal::zero() {
        &margin_amount / &sale * hundred()
    } else {
        BigDecimal::zero()
    };

    PlResult {
        sale_price: sale,
        indirect,
        commission1,
        commission2,
        royalty,
        financing,
        profit_tax,
        profit_share,
        total_cost,
        margin_amount,
        margin_pct,
    }
}

/// 第一年 / 第二年对比
pub fn compare(year_one: &PlScenario, year_two: &PlScenario) -> PlComparison {
    PlComparison {
        year_one: project(year_one),
        year_two: project(year_two),
    }
}

/// 当前毛利率：(净额 - 运营成本) / 净额 × 100，净额为 0 时返回 0
pub fn current_margin(net_total: &BigDecimal, operating_cost: &BigDecimal) -> BigDecimal {
    if net_total.is_zero() {
        return BigDecimal::zero();
    }
    (net_total - operating_cost) / net_total * hundred()
}

/// 建议售价
pub fn suggested_price(operating_cost: &BigDecimal, desired_margin: &BigDecimal) -> BigDecimal {
    implied_sale_price(operating_cost, desired_margin)
}

pub fn margin_band(margin_pct: &BigDecimal) -> MarginBand {
    if *margin_pct <= BigDecimal::zero() {
        MarginBand::Loss
    } else if *margin_pct < BigDecimal::from(20) {
        MarginBand::Thin
    } else {
        MarginBand::Healthy
    }
}
