pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use crate::core::{ConfigProvider, PricingInput};
    use crate::domain::model::OutputFormat;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_archive_filename, validate_output_formats, validate_path, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "price-optimizer")]
    #[command(about = "Recommend a selling price and project revenue for a product")]
    pub struct CliConfig {
        /// Product name, at least two characters
        #[arg(long)]
        pub name: String,

        /// electronics, clothing, home, beauty, toys, books or sports; anything else uses the default markup
        #[arg(long)]
        pub category: String,

        /// Manufacturing or wholesale cost per unit
        #[arg(long, allow_hyphen_values = true)]
        pub base_cost: f64,

        #[arg(long)]
        pub description: Option<String>,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_enum, value_delimiter = ',', default_values = ["csv", "json"])]
        pub formats: Vec<OutputFormat>,

        /// Pack all report files into a single zip
        #[arg(long)]
        pub archive: bool,

        #[arg(long, default_value = "pricing_report.zip")]
        pub archive_name: String,

        /// Seed the price jitter and competitor generator for reproducible output
        #[arg(long)]
        pub seed: Option<u64>,

        #[arg(long)]
        pub no_competitors: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        pub fn product(&self) -> PricingInput {
            PricingInput {
                description: self.description.clone(),
                ..PricingInput::new(self.name.clone(), self.category.as_str(), self.base_cost)
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn products(&self) -> Vec<PricingInput> {
            vec![self.product()]
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[OutputFormat] {
            &self.formats
        }

        fn archive_filename(&self) -> Option<&str> {
            self.archive.then_some(self.archive_name.as_str())
        }

        fn seed(&self) -> Option<u64> {
            self.seed
        }

        fn include_competitors(&self) -> bool {
            !self.no_competitors
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            self.product().validate()?;
            validate_path("output_path", &self.output_path)?;
            validate_output_formats("formats", &self.formats)?;
            if self.archive {
                validate_archive_filename("archive_name", &self.archive_name)?;
            }
            Ok(())
        }
    }

}
