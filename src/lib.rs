pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    engine::{PricingEngine, RunOutcome},
    pipeline::PricingPipeline,
    pricing::{
        compute_elasticity_curve, compute_optimal_price, compute_revenue_curve, FixedJitter,
        JitterSource, PricingModel, RngJitter,
    },
};
pub use domain::model::{
    Category, CompetitorQuote, ElasticityClass, ElasticityPoint, MarginTier, OutputFormat,
    PriceRecommendation, PriceSummary, PricingInput, PricingReport, RevenuePoint,
};
pub use utils::error::{PricingError, Result};
