//! Synthetic competitor quotes around a recommended price.
//!
//! Nothing here is observed market data; quotes are drawn fresh from the
//! supplied generator on every call.

use crate::domain::model::{CompetitorQuote, PriceComparison};
use rand::seq::SliceRandom;
use rand::Rng;

pub const COMPETITOR_NAMES: [&str; 8] = [
    "Amazon Basics",
    "Best Buy",
    "Walmart",
    "Target",
    "Costco",
    "eBay Seller",
    "Newegg",
    "AliExpress",
];

pub const MIN_COMPETITORS: usize = 3;
pub const MAX_COMPETITORS: usize = 5;
pub const MAX_PRICE_SPREAD: f64 = 0.3;
const SIMILAR_BAND: f64 = 0.05;

pub fn compare(price: f64, optimal_price: f64) -> PriceComparison {
    if price > optimal_price * (1.0 + SIMILAR_BAND) {
        PriceComparison::Higher
    } else if price < optimal_price * (1.0 - SIMILAR_BAND) {
        PriceComparison::Lower
    } else {
        PriceComparison::Similar
    }
}

/// Between three and five quotes with distinct names, sorted by ascending price.
pub fn generate_competitors<R: Rng + ?Sized>(optimal_price: f64, rng: &mut R) -> Vec<CompetitorQuote> {
    let count = rng.gen_range(MIN_COMPETITORS..=MAX_COMPETITORS);
    let names: Vec<&str> = COMPETITOR_NAMES.choose_multiple(rng, count).copied().collect();

    let mut quotes: Vec<CompetitorQuote> = names
        .into_iter()
        .map(|name| {
            let spread = rng.gen_range(-MAX_PRICE_SPREAD..MAX_PRICE_SPREAD);
            let price = optimal_price * (1.0 + spread);
            CompetitorQuote {
                name: name.to_string(),
                price,
                comparison: compare(price, optimal_price),
                percent_diff: ((price - optimal_price) / optimal_price).abs() * 100.0,
            }
        })
        .collect();

    quotes.sort_by(|a, b| a.price.total_cmp(&b.price));
    quotes
}
