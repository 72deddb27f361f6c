//! Pricing model: recommended price, revenue curve and elasticity curve.
//!
//! All three operations are pure apart from the jitter drawn by
//! [`compute_optimal_price`]. None of them validate their input: a non-finite
//! or non-positive `base_cost` / `optimal_price` produces non-finite or
//! meaningless output. Callers validate a [`PricingInput`] first.

use crate::domain::model::{Category, ElasticityPoint, PricingInput, PriceRecommendation, RevenuePoint};
use chrono::Utc;
use rand::rngs::ThreadRng;
use rand::Rng;

pub const JITTER_MIN: f64 = 0.95;
pub const JITTER_MAX: f64 = 1.05;

pub const CURVE_POINTS: usize = 15;
pub const MIN_PRICE_MULTIPLIER: f64 = 1.05;
pub const MAX_PRICE_MULTIPLIER: f64 = 3.0;
pub const REFERENCE_QUANTITY: f64 = 1000.0;
pub const REVENUE_ELASTICITY: f64 = -1.2;

/// Source of the multiplicative jitter applied to the recommended price.
pub trait JitterSource {
    /// Next factor, expected in `[JITTER_MIN, JITTER_MAX]`.
    fn next_factor(&mut self) -> f64;
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    fn next_factor(&mut self) -> f64 {
        (**self).next_factor()
    }
}

/// Uniform jitter drawn from any `rand` generator.
pub struct RngJitter<R: Rng> {
    rng: R,
}

impl<R: Rng> RngJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<ThreadRng> {
    pub fn thread_local() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> JitterSource for RngJitter<R> {
    fn next_factor(&mut self) -> f64 {
        self.rng.gen_range(JITTER_MIN..=JITTER_MAX)
    }
}

/// Always returns the same factor, which pins the price in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn next_factor(&mut self) -> f64 {
        self.0
    }
}

/// Round half away from zero to the nearest cent.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `CURVE_POINTS` prices spaced evenly over `[cost × 1.05, cost × 3]`,
/// both ends included. Unrounded.
pub fn price_grid(base_cost: f64) -> impl Iterator<Item = f64> {
    let min_price = base_cost * MIN_PRICE_MULTIPLIER;
    let max_price = base_cost * MAX_PRICE_MULTIPLIER;
    let last = (CURVE_POINTS - 1) as f64;

    (0..CURVE_POINTS).map(move |i| min_price + (max_price - min_price) * (i as f64 / last))
}

fn demand(price_ratio: f64, elasticity: f64) -> u64 {
    // `as` saturates: NaN becomes 0, never negative.
    (REFERENCE_QUANTITY * price_ratio.powf(elasticity)).round() as u64
}

pub fn compute_optimal_price<J: JitterSource>(
    base_cost: f64,
    category: Category,
    jitter: &mut J,
) -> f64 {
    let factor = jitter.next_factor();
    round_to_cents(base_cost * category.markup_factor() * factor)
}

pub fn compute_revenue_curve(base_cost: f64, optimal_price: f64) -> Vec<RevenuePoint> {
    price_grid(base_cost)
        .map(|price| {
            let units_sold = demand(price / optimal_price, REVENUE_ELASTICITY);
            RevenuePoint {
                price: round_to_cents(price),
                revenue: (price * units_sold as f64).round() as u64,
                units_sold,
            }
        })
        .collect()
}

/// Elasticity gets stronger as the price moves above the recommendation:
/// `base × (0.8 + 0.4 × price / optimal)`.
pub fn compute_elasticity_curve(
    base_cost: f64,
    optimal_price: f64,
    category: Category,
) -> Vec<ElasticityPoint> {
    let base_elasticity = category.base_elasticity();

    price_grid(base_cost)
        .map(|price| {
            let price_ratio = price / optimal_price;
            let elasticity = base_elasticity * (0.8 + 0.4 * price_ratio);
            ElasticityPoint {
                price: round_to_cents(price),
                quantity: demand(price_ratio, elasticity),
                elasticity,
            }
        })
        .collect()
}

/// The three operations bundled with their jitter source.
pub struct PricingModel<J: JitterSource> {
    jitter: J,
}

impl PricingModel<RngJitter<ThreadRng>> {
    pub fn with_thread_rng() -> Self {
        Self::new(RngJitter::thread_local())
    }
}

impl<J: JitterSource> PricingModel<J> {
    pub fn new(jitter: J) -> Self {
        Self { jitter }
    }

    pub fn optimal_price(&mut self, base_cost: f64, category: Category) -> f64 {
        compute_optimal_price(base_cost, category, &mut self.jitter)
    }

    pub fn revenue_curve(&self, base_cost: f64, optimal_price: f64) -> Vec<RevenuePoint> {
        compute_revenue_curve(base_cost, optimal_price)
    }

    pub fn elasticity_curve(
        &self,
        base_cost: f64,
        optimal_price: f64,
        category: Category,
    ) -> Vec<ElasticityPoint> {
        compute_elasticity_curve(base_cost, optimal_price, category)
    }

    pub fn recommend(&mut self, input: &PricingInput) -> PriceRecommendation {
        PriceRecommendation {
            optimal_price: self.optimal_price(input.base_cost, input.category),
            generated_at: Utc::now(),
        }
    }
}
