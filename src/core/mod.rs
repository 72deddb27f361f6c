pub mod competitors;
pub mod engine;
pub mod pipeline;
pub mod pricing;
pub mod summary;

pub use crate::domain::model::{PricingInput, PricingReport, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
