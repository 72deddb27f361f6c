use crate::core::competitors::generate_competitors;
use crate::core::pricing::{PricingModel, RngJitter};
use crate::core::summary::summarize;
use crate::core::{ConfigProvider, Pipeline, PricingInput, Storage, TransformResult};
use crate::domain::model::{
    ElasticityClass, MarginTier, OutputFormat, PriceComparison, PricingReport,
};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::Validate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use zip::write::{FileOptions, ZipWriter};

pub const RECOMMENDATIONS_FILE: &str = "recommendations";
pub const REVENUE_CURVE_FILE: &str = "revenue_curve";
pub const ELASTICITY_CURVE_FILE: &str = "elasticity_curve";
pub const COMPETITORS_FILE: &str = "competitors";
pub const JSON_REPORT_FILE: &str = "pricing_report.json";

#[derive(Serialize)]
struct RecommendationRow<'a> {
    product: &'a str,
    category: &'a str,
    base_cost: f64,
    optimal_price: f64,
    markup_percent: f64,
    profit: f64,
    profit_margin_percent: f64,
    margin_tier: MarginTier,
    generated_at: String,
}

#[derive(Serialize)]
struct RevenueRow<'a> {
    product: &'a str,
    price: f64,
    revenue: u64,
    units_sold: u64,
}

#[derive(Serialize)]
struct ElasticityRow<'a> {
    product: &'a str,
    price: f64,
    quantity: u64,
    elasticity: f64,
    classification: ElasticityClass,
}

#[derive(Serialize)]
struct CompetitorRow<'a> {
    product: &'a str,
    competitor: &'a str,
    price: f64,
    comparison: PriceComparison,
    percent_diff: f64,
}

fn write_table<T: Serialize>(rows: impl IntoIterator<Item = T>, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| PricingError::IoError(e.into_error()))
}

/// Renders reports into `(file name, bytes)` pairs, one set per format.
pub fn render_reports(
    reports: &[PricingReport],
    formats: &[OutputFormat],
    include_competitors: bool,
) -> Result<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();

    for format in formats {
        let Some(delimiter) = format.delimiter() else {
            let json = serde_json::to_vec_pretty(reports)?;
            files.push((JSON_REPORT_FILE.to_string(), json));
            continue;
        };
        let ext = format.extension();

        let recommendations = reports.iter().map(|r| RecommendationRow {
            product: &r.input.name,
            category: r.input.category.key(),
            base_cost: r.input.base_cost,
            optimal_price: r.recommendation.optimal_price,
            markup_percent: r.summary.markup_percent,
            profit: r.summary.profit,
            profit_margin_percent: r.summary.profit_margin_percent,
            margin_tier: r.summary.margin_tier,
            generated_at: r.recommendation.generated_at.to_rfc3339(),
        });
        files.push((
            format!("{}.{}", RECOMMENDATIONS_FILE, ext),
            write_table(recommendations, delimiter)?,
        ));

        let revenue = reports.iter().flat_map(|r| {
            r.revenue_curve.iter().map(move |p| RevenueRow {
                product: &r.input.name,
                price: p.price,
                revenue: p.revenue,
                units_sold: p.units_sold,
            })
        });
        files.push((
            format!("{}.{}", REVENUE_CURVE_FILE, ext),
            write_table(revenue, delimiter)?,
        ));

        let elasticity = reports.iter().flat_map(|r| {
            r.elasticity_curve.iter().map(move |p| ElasticityRow {
                product: &r.input.name,
                price: p.price,
                quantity: p.quantity,
                elasticity: p.elasticity,
                classification: p.classification(),
            })
        });
        files.push((
            format!("{}.{}", ELASTICITY_CURVE_FILE, ext),
            write_table(elasticity, delimiter)?,
        ));

        if include_competitors {
            let competitors = reports.iter().flat_map(|r| {
                r.competitors.iter().map(move |c| CompetitorRow {
                    product: &r.input.name,
                    competitor: &c.name,
                    price: c.price,
                    comparison: c.comparison,
                    percent_diff: c.percent_diff,
                })
            });
            files.push((
                format!("{}.{}", COMPETITORS_FILE, ext),
                write_table(competitors, delimiter)?,
            ));
        }
    }

    Ok(files)
}

pub struct PricingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    rng: Mutex<StdRng>,
}

impl<S: Storage, C: ConfigProvider> PricingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let rng = match config.seed() {
            Some(seed) => {
                tracing::debug!("Seeding pricing RNG with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        Self {
            storage,
            config,
            rng: Mutex::new(rng),
        }
    }

    fn price_product(&self, input: PricingInput) -> Result<PricingReport> {
        let mut rng = self.rng.lock().map_err(|_| PricingError::ProcessingError {
            message: "pricing RNG lock poisoned".to_string(),
        })?;

        let mut model = PricingModel::new(RngJitter::new(&mut *rng));
        let recommendation = model.recommend(&input);
        let optimal_price = recommendation.optimal_price;

        let revenue_curve = model.revenue_curve(input.base_cost, optimal_price);
        let elasticity_curve = model.elasticity_curve(input.base_cost, optimal_price, input.category);

        let competitors = if self.config.include_competitors() {
            generate_competitors(optimal_price, &mut *rng)
        } else {
            Vec::new()
        };

        Ok(PricingReport {
            summary: summarize(input.base_cost, optimal_price),
            input,
            recommendation,
            revenue_curve,
            elasticity_curve,
            competitors,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PricingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<PricingInput>> {
        let products = self.config.products();
        if products.is_empty() {
            return Err(PricingError::MissingConfigError {
                field: "products".to_string(),
            });
        }

        for product in &products {
            product.validate()?;
        }

        tracing::debug!("Extracted {} product(s) from configuration", products.len());
        Ok(products)
    }

    async fn transform(&self, inputs: Vec<PricingInput>) -> Result<TransformResult> {
        let mut reports = Vec::with_capacity(inputs.len());

        for input in inputs {
            let report = self.price_product(input)?;
            tracing::debug!(
                "Priced '{}' ({}) at {:.2} from cost {:.2}",
                report.input.name,
                report.input.category,
                report.recommendation.optimal_price,
                report.input.base_cost
            );
            reports.push(report);
        }

        Ok(TransformResult { reports })
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let files = render_reports(
            &result.reports,
            self.config.output_formats(),
            self.config.include_competitors(),
        )?;

        let Some(archive_name) = self.config.archive_filename() else {
            for (name, data) in &files {
                tracing::debug!("Writing {} ({} bytes) to storage", name, data.len());
                self.storage.write_file(name, data).await?;
            }
            return Ok(self.config.output_path().to_string());
        };

        tracing::debug!("Creating ZIP file with {} files", files.len());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(data)?;
            }
            // 完成並取回底層 Vec<u8>
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(archive_name, &zip_data).await?;

        Ok(Path::new(self.config.output_path())
            .join(archive_name)
            .to_string_lossy()
            .into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Category;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        products: Vec<PricingInput>,
        output_path: String,
        formats: Vec<OutputFormat>,
        archive: Option<String>,
        competitors: bool,
    }

    impl MockConfig {
        fn new(products: Vec<PricingInput>) -> Self {
            Self {
                products,
                output_path: "test_output".to_string(),
                formats: vec![OutputFormat::Csv, OutputFormat::Json],
                archive: None,
                competitors: true,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn products(&self) -> Vec<PricingInput> {
            self.products.clone()
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[OutputFormat] {
            &self.formats
        }

        fn archive_filename(&self) -> Option<&str> {
            self.archive.as_deref()
        }

        fn seed(&self) -> Option<u64> {
            Some(11)
        }

        fn include_competitors(&self) -> bool {
            self.competitors
        }
    }

    fn headphones() -> PricingInput {
        PricingInput::new("Wireless Headphones", "electronics", 20.0)
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_products() {
        let config = MockConfig::new(vec![PricingInput::new("Mug", "home", -3.0)]);
        let pipeline = PricingPipeline::new(MockStorage::new(), config);

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, PricingError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_extract_requires_products() {
        let pipeline = PricingPipeline::new(MockStorage::new(), MockConfig::new(vec![]));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, PricingError::MissingConfigError { .. }));
    }

    #[tokio::test]
    async fn test_transform_builds_full_report() {
        let pipeline = PricingPipeline::new(MockStorage::new(), MockConfig::new(vec![headphones()]));

        let inputs = pipeline.extract().await.unwrap();
        let result = pipeline.transform(inputs).await.unwrap();

        assert_eq!(result.reports.len(), 1);
        let report = &result.reports[0];
        assert_eq!(report.input.category, Category::Electronics);
        assert!(report.recommendation.optimal_price >= 26.6);
        assert!(report.recommendation.optimal_price <= 29.4);
        assert_eq!(report.revenue_curve.len(), 15);
        assert_eq!(report.elasticity_curve.len(), 15);
        assert!((3..=5).contains(&report.competitors.len()));
    }

    #[tokio::test]
    async fn test_same_seed_same_prices() {
        let a = PricingPipeline::new(MockStorage::new(), MockConfig::new(vec![headphones()]));
        let b = PricingPipeline::new(MockStorage::new(), MockConfig::new(vec![headphones()]));

        let ra = a.transform(vec![headphones()]).await.unwrap();
        let rb = b.transform(vec![headphones()]).await.unwrap();

        assert_eq!(
            ra.reports[0].recommendation.optimal_price,
            rb.reports[0].recommendation.optimal_price
        );
        assert_eq!(ra.reports[0].competitors, rb.reports[0].competitors);
    }

    #[tokio::test]
    async fn test_load_writes_individual_files() {
        let storage = MockStorage::new();
        let pipeline = PricingPipeline::new(storage.clone(), MockConfig::new(vec![headphones()]));

        let result = pipeline.transform(vec![headphones()]).await.unwrap();
        let output = pipeline.load(&result).await.unwrap();

        assert_eq!(output, "test_output");
        assert_eq!(
            storage.file_names().await,
            vec![
                "competitors.csv",
                "elasticity_curve.csv",
                "pricing_report.json",
                "recommendations.csv",
                "revenue_curve.csv",
            ]
        );

        let revenue = String::from_utf8(storage.get_file("revenue_curve.csv").await.unwrap()).unwrap();
        let mut lines = revenue.lines();
        assert_eq!(lines.next(), Some("product,price,revenue,units_sold"));
        assert_eq!(lines.count(), 15);

        let json = storage.get_file("pricing_report.json").await.unwrap();
        let reports: Vec<PricingReport> = serde_json::from_slice(&json).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].input.name, "Wireless Headphones");
    }

    #[tokio::test]
    async fn test_load_without_competitors_skips_table() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(vec![headphones()]);
        config.competitors = false;
        config.formats = vec![OutputFormat::Tsv];
        let pipeline = PricingPipeline::new(storage.clone(), config);

        let result = pipeline.transform(vec![headphones()]).await.unwrap();
        assert!(result.reports[0].competitors.is_empty());
        pipeline.load(&result).await.unwrap();

        assert_eq!(
            storage.file_names().await,
            vec!["elasticity_curve.tsv", "recommendations.tsv", "revenue_curve.tsv"]
        );
        let elasticity =
            String::from_utf8(storage.get_file("elasticity_curve.tsv").await.unwrap()).unwrap();
        assert!(elasticity.starts_with("product\tprice\tquantity\telasticity\tclassification"));
    }

    #[tokio::test]
    async fn test_load_creates_archive() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(vec![headphones()]);
        config.archive = Some("pricing_report.zip".to_string());
        let pipeline = PricingPipeline::new(storage.clone(), config);

        let result = pipeline.transform(vec![headphones()]).await.unwrap();
        let output = pipeline.load(&result).await.unwrap();

        assert!(output.ends_with("pricing_report.zip"));
        assert_eq!(storage.file_names().await, vec!["pricing_report.zip"]);

        let zip_data = storage.get_file("pricing_report.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 5);
    }
}
