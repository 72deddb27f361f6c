use crate::domain::model::{MarginTier, PriceSummary};

const HIGH_MARGIN_MARKUP: f64 = 50.0;
const LOW_MARGIN_MARKUP: f64 = 20.0;

pub fn margin_tier(markup_percent: f64) -> MarginTier {
    if markup_percent > HIGH_MARGIN_MARKUP {
        MarginTier::High
    } else if markup_percent < LOW_MARGIN_MARKUP {
        MarginTier::Low
    } else {
        MarginTier::Average
    }
}

/// Markup is relative to cost, margin relative to the selling price.
pub fn summarize(base_cost: f64, optimal_price: f64) -> PriceSummary {
    let profit = optimal_price - base_cost;
    let markup_percent = profit / base_cost * 100.0;

    PriceSummary {
        markup_percent,
        profit,
        profit_margin_percent: profit / optimal_price * 100.0,
        margin_tier: margin_tier(markup_percent),
    }
}
