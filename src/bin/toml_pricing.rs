use anyhow::Context;
use clap::Parser;
use price_optimizer::config::toml_config::TomlConfig;
use price_optimizer::core::pricing::{price_grid, JITTER_MAX, JITTER_MIN};
use price_optimizer::core::ConfigProvider;
use price_optimizer::utils::{logger, validation::Validate};
use price_optimizer::{LocalStorage, PricingEngine, PricingPipeline};

#[derive(Parser)]
#[command(name = "toml-pricing")]
#[command(about = "Price a batch of products described in a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "pricing.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the RNG seed from config
    #[arg(long)]
    seed: Option<u64>,

    /// Show what would be priced without writing any output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    // 初始化日誌
    logger::init_logger(args.verbose, config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(seed) = args.seed {
        config.run.seed = Some(seed);
        tracing::info!("🔧 Seed overridden to: {}", seed);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PricingPipeline::new(storage, config);
    let engine = PricingEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            for report in &outcome.reports {
                println!(
                    "  {:<28} {:<12} cost ${:>9.2} → ${:>9.2} ({:?} margin)",
                    report.input.name,
                    report.input.category.key(),
                    report.input.base_cost,
                    report.recommendation.optimal_price,
                    report.summary.margin_tier
                );
            }
            println!("✅ Priced {} product(s)", outcome.reports.len());
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Pricing run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Run: {}", config.run.name);
    if let Some(description) = &config.run.description {
        println!("  Description: {}", description);
    }
    println!("  Products: {}", config.products.len());
    println!("  Output: {}", config.output_path());
    let formats: Vec<&str> = config.output_formats().iter().map(|f| f.extension()).collect();
    println!("  Formats: {}", formats.join(", "));
    if let Some(archive) = config.archive_filename() {
        println!("  Archive: {}", archive);
    }
    println!("  Competitors: {}", config.include_competitors());
    match config.seed() {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: random"),
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

/// Shows the jitter band of each product instead of drawing a price.
fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    for product in &config.products {
        let nominal = product.base_cost * product.category.markup_factor();
        let mut grid = price_grid(product.base_cost);
        let first = grid.next().unwrap_or_default();
        let last = grid.last().unwrap_or(first);
        println!(
            "  {} [{}] markup x{:.1}: ${:.2} - ${:.2}, curves ${:.2} - ${:.2}",
            product.name,
            product.category.display_name(),
            product.category.markup_factor(),
            nominal * JITTER_MIN,
            nominal * JITTER_MAX,
            first,
            last
        );
    }
    println!();
    println!("✅ Dry run complete. No files were written.");
}
