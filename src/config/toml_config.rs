use crate::core::{ConfigProvider, PricingInput};
use crate::domain::model::OutputFormat;
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{
    validate_archive_filename, validate_non_empty_string, validate_output_formats, validate_path,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ARCHIVE_NAME: &str = "pricing_report.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub run: RunConfig,
    pub output: OutputConfig,
    pub competitors: Option<CompetitorConfig>,
    pub monitoring: Option<MonitoringConfig>,
    #[serde(default)]
    pub products: Vec<PricingInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub description: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,
    #[serde(default)]
    pub archive: bool,
    pub archive_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Csv, OutputFormat::Json]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BASE_COST})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PricingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("run.name", &self.run.name)?;
        validate_path("output.path", &self.output.path)?;
        validate_output_formats("output.formats", &self.output.formats)?;

        if let Some(filename) = &self.output.archive_filename {
            validate_archive_filename("output.archive_filename", filename)?;
        }

        if self.products.is_empty() {
            return Err(PricingError::MissingConfigError {
                field: "products".to_string(),
            });
        }

        for (index, product) in self.products.iter().enumerate() {
            product
                .validate()
                .map_err(|e| PricingError::ConfigValidationError {
                    field: format!("products[{}]", index),
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn competitors_enabled(&self) -> bool {
        self.competitors.as_ref().map(|c| c.enabled).unwrap_or(true)
    }
}

impl ConfigProvider for TomlConfig {
    fn products(&self) -> Vec<PricingInput> {
        self.products.clone()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output.formats
    }

    fn archive_filename(&self) -> Option<&str> {
        if !self.output.archive {
            return None;
        }
        Some(
            self.output
                .archive_filename
                .as_deref()
                .unwrap_or(DEFAULT_ARCHIVE_NAME),
        )
    }

    fn seed(&self) -> Option<u64> {
        self.run.seed
    }

    fn include_competitors(&self) -> bool {
        self.competitors_enabled()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Category;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[run]
name = "spring-catalog"
seed = 42

[output]
path = "./test-output"
formats = ["csv", "tsv"]
archive = true

[[products]]
name = "Wireless Headphones"
category = "electronics"
base_cost = 20.0

[[products]]
name = "Desk Fan"
category = "appliances"
base_cost = 14.5
description = "Quiet three-speed fan"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.run.name, "spring-catalog");
        assert_eq!(config.seed(), Some(42));
        assert_eq!(config.output_formats(), &[OutputFormat::Csv, OutputFormat::Tsv]);
        assert_eq!(config.archive_filename(), Some(DEFAULT_ARCHIVE_NAME));
        assert!(config.include_competitors());
        assert!(!config.monitoring_enabled());

        let products = config.products();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].category, Category::Electronics);
        assert_eq!(products[1].category, Category::Other);
        assert_eq!(products[1].description.as_deref(), Some("Quiet three-speed fan"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_formats_and_no_archive() {
        let config = TomlConfig::from_toml_str(
            r#"
[run]
name = "defaults"

[output]
path = "./output"

[competitors]
enabled = false

[[products]]
name = "Novel"
category = "books"
base_cost = 6.0
"#,
        )
        .unwrap();

        assert_eq!(config.output_formats(), &[OutputFormat::Csv, OutputFormat::Json]);
        assert_eq!(config.archive_filename(), None);
        assert!(!config.include_competitors());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PRICING_TEST_BASE_COST", "12.75");

        let config = TomlConfig::from_toml_str(
            r#"
[run]
name = "env"

[output]
path = "./output"

[[products]]
name = "Yoga Mat"
category = "sports"
base_cost = ${PRICING_TEST_BASE_COST}
"#,
        )
        .unwrap();
        assert_eq!(config.products[0].base_cost, 12.75);

        std::env::remove_var("PRICING_TEST_BASE_COST");
    }

    #[test]
    fn test_unknown_output_format_fails_to_parse() {
        let result = TomlConfig::from_toml_str(
            r#"
[run]
name = "bad"

[output]
path = "./output"
formats = ["xlsx"]
"#,
        );
        assert!(matches!(
            result,
            Err(PricingError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[run]
name = "invalid"

[output]
path = "./output"

[[products]]
name = "Lipstick"
category = "beauty"
base_cost = 0.0
"#,
        )
        .unwrap();

        match config.validate() {
            Err(PricingError::ConfigValidationError { field, .. }) => {
                assert_eq!(field, "products[0]")
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let empty = TomlConfig::from_toml_str(
            r#"
[run]
name = "empty"

[output]
path = "./output"
"#,
        )
        .unwrap();
        assert!(matches!(
            empty.validate(),
            Err(PricingError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.run.name, "spring-catalog");
    }
}
