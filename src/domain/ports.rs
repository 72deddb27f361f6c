use crate::domain::model::{OutputFormat, PricingInput, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Write-only sink for rendered report files. Paths are relative to the
/// configured output location.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn products(&self) -> Vec<PricingInput>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    /// When set, all report files are packed into this zip instead of being
    /// written one by one.
    fn archive_filename(&self) -> Option<&str>;
    fn seed(&self) -> Option<u64>;
    fn include_competitors(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<PricingInput>>;
    async fn transform(&self, inputs: Vec<PricingInput>) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
