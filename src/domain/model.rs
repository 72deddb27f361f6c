use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category driving both lookup tables of the pricing model.
///
/// Unrecognised keys resolve to [`Category::Other`] (key `default`) instead of
/// failing, so every string a caller hands in maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Electronics,
    Clothing,
    Home,
    Beauty,
    Toys,
    Books,
    Sports,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Clothing,
        Category::Home,
        Category::Beauty,
        Category::Toys,
        Category::Books,
        Category::Sports,
        Category::Other,
    ];

    /// Resolve a category key. Matching is exact: `"Electronics"` is not a key.
    pub fn from_key(key: &str) -> Self {
        match key {
            "electronics" => Category::Electronics,
            "clothing" => Category::Clothing,
            "home" => Category::Home,
            "beauty" => Category::Beauty,
            "toys" => Category::Toys,
            "books" => Category::Books,
            "sports" => Category::Sports,
            _ => Category::Other,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Home => "home",
            Category::Beauty => "beauty",
            Category::Toys => "toys",
            Category::Books => "books",
            Category::Sports => "sports",
            Category::Other => "default",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Home => "Home & Kitchen",
            Category::Beauty => "Beauty & Personal Care",
            Category::Toys => "Toys & Games",
            Category::Books => "Books",
            Category::Sports => "Sports & Outdoors",
            Category::Other => "Other",
        }
    }

    /// List-price multiplier applied to base cost.
    pub fn markup_factor(&self) -> f64 {
        match self {
            Category::Electronics => 1.4,
            Category::Clothing => 2.2,
            Category::Home => 1.8,
            Category::Beauty => 2.5,
            Category::Toys => 1.9,
            Category::Books => 1.5,
            Category::Sports => 1.7,
            Category::Other => 1.6,
        }
    }

    /// Price elasticity of demand at the reference price. Always negative.
    pub fn base_elasticity(&self) -> f64 {
        match self {
            Category::Electronics => -1.5,
            Category::Clothing => -1.2,
            Category::Home => -1.0,
            Category::Beauty => -0.8,
            Category::Toys => -1.3,
            Category::Books => -0.7,
            Category::Sports => -1.1,
            Category::Other => -1.0,
        }
    }
}

impl From<&str> for Category {
    fn from(key: &str) -> Self {
        Category::from_key(key)
    }
}

impl From<String> for Category {
    fn from(key: String) -> Self {
        Category::from_key(&key)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.key().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub name: String,
    pub category: Category,
    pub base_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PricingInput {
    pub fn new(name: impl Into<String>, category: impl Into<Category>, base_cost: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            base_cost,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecommendation {
    pub optimal_price: f64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub price: f64,
    pub revenue: u64,
    pub units_sold: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticityPoint {
    pub price: f64,
    pub quantity: u64,
    pub elasticity: f64,
}

impl ElasticityPoint {
    pub fn classification(&self) -> ElasticityClass {
        ElasticityClass::from_elasticity(self.elasticity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElasticityClass {
    Elastic,
    Unitary,
    Inelastic,
}

impl ElasticityClass {
    const UNITARY_TOLERANCE: f64 = 1e-9;

    /// `< -1` is elastic, `> -1` inelastic, `-1` itself unitary.
    pub fn from_elasticity(elasticity: f64) -> Self {
        if (elasticity + 1.0).abs() <= Self::UNITARY_TOLERANCE {
            ElasticityClass::Unitary
        } else if elasticity < -1.0 {
            ElasticityClass::Elastic
        } else {
            ElasticityClass::Inelastic
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginTier {
    High,
    Average,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub markup_percent: f64,
    pub profit: f64,
    pub profit_margin_percent: f64,
    pub margin_tier: MarginTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceComparison {
    Higher,
    Lower,
    Similar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorQuote {
    pub name: String,
    pub price: f64,
    pub comparison: PriceComparison,
    pub percent_diff: f64,
}

/// Everything derived for one product in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingReport {
    pub input: PricingInput,
    pub recommendation: PriceRecommendation,
    pub summary: PriceSummary,
    pub revenue_curve: Vec<RevenuePoint>,
    pub elasticity_curve: Vec<ElasticityPoint>,
    pub competitors: Vec<CompetitorQuote>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    pub fn delimiter(&self) -> Option<u8> {
        match self {
            OutputFormat::Csv => Some(b','),
            OutputFormat::Tsv => Some(b'\t'),
            OutputFormat::Json => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub reports: Vec<PricingReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_falls_back_to_default() {
        let category = Category::from_key("widgets");
        assert_eq!(category, Category::Other);
        assert_eq!(category.key(), "default");
        assert_eq!(category.markup_factor(), 1.6);
        assert_eq!(category.base_elasticity(), -1.0);
    }

    #[test]
    fn test_category_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), category);
        }
    }

    #[test]
    fn test_category_serde_uses_keys() {
        let input: PricingInput = serde_json::from_value(serde_json::json!({
            "name": "Lamp",
            "category": "gadgets",
            "base_cost": 12.5
        }))
        .unwrap();
        assert_eq!(input.category, Category::Other);

        let json = serde_json::to_value(PricingInput::new("Lamp", "home", 12.5)).unwrap();
        assert_eq!(json["category"], "home");
    }

    #[test]
    fn test_elasticity_classification_boundary() {
        assert_eq!(ElasticityClass::from_elasticity(-1.5), ElasticityClass::Elastic);
        assert_eq!(ElasticityClass::from_elasticity(-1.0), ElasticityClass::Unitary);
        assert_eq!(ElasticityClass::from_elasticity(-0.7), ElasticityClass::Inelastic);
    }
}
