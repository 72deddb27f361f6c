use clap::Parser;
use price_optimizer::utils::{logger, validation::Validate};
use price_optimizer::{CliConfig, LocalStorage, PricingEngine, PricingPipeline, PricingReport};

fn print_report(report: &PricingReport) {
    let summary = &report.summary;
    println!(
        "💲 Recommended price for {}: ${:.2}",
        report.input.name, report.recommendation.optimal_price
    );
    println!(
        "   Category: {} | Base cost: ${:.2} | Profit: ${:.2}",
        report.input.category.display_name(),
        report.input.base_cost,
        summary.profit
    );
    println!(
        "   Markup: {:.1}% | Profit margin: {:.1}% | Tier: {:?}",
        summary.markup_percent, summary.profit_margin_percent, summary.margin_tier
    );
    if let Some(best) = report.revenue_curve.iter().max_by_key(|p| p.revenue) {
        println!(
            "   Peak projected revenue: ${} at ${:.2} ({} units)",
            best.revenue, best.price, best.units_sold
        );
    }
    for quote in &report.competitors {
        println!(
            "   {:<14} ${:>8.2}  {:?} ({:.1}%)",
            quote.name, quote.price, quote.comparison, quote.percent_diff
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting price-optimizer CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = PricingPipeline::new(storage, config);
    let engine = PricingEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            for report in &outcome.reports {
                print_report(report);
            }
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Pricing run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
