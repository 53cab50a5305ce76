//! Budget and balance arithmetic shared by every order kind.

use serde::Serialize;

/// Words billed as one page.
pub const WORDS_PER_PAGE: f64 = 275.0;

/// Per-kind prices applied when a submission leaves them blank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingDefaults {
    pub cost_per_page: f64,
    pub code_price: f64,
}

pub const NORMAL_PRICING: PricingDefaults = PricingDefaults {
    cost_per_page: 200.0,
    code_price: 500.0,
};

pub const DISSERTATION_PRICING: PricingDefaults = PricingDefaults {
    cost_per_page: 425.0,
    code_price: 10_000.0,
};

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `pages * cost_per_page`, plus the flat code surcharge when the order carries code.
/// Pages are fractional (`word_count / 275`), never rounded.
pub fn compute_budget(word_count: u32, cost_per_page: f64, has_code: bool, code_price: f64) -> f64 {
    let pages = f64::from(word_count) / WORDS_PER_PAGE;
    let base = pages * finite_or_zero(cost_per_page);
    if has_code {
        base + finite_or_zero(code_price)
    } else {
        base
    }
}

/// Outstanding amount, floored at zero once payments cover the budget.
pub fn compute_remaining_balance(budget: f64, total_paid: f64) -> f64 {
    (finite_or_zero(budget) - finite_or_zero(total_paid)).max(0.0)
}
