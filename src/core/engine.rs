use crate::core::{Pipeline, PricingReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// What a finished run produced: where the output went and the reports
/// themselves, so front-ends can print a summary without re-reading files.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output_path: String,
    pub reports: Vec<PricingReport>,
}

pub struct PricingEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> PricingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("🚀 Starting pricing run");

        let inputs = self.pipeline.extract().await?;
        tracing::info!("📥 Loaded {} product(s)", inputs.len());
        self.monitor.log_phase("Extract");

        let result = self.pipeline.transform(inputs).await?;
        tracing::info!("🧮 Priced {} product(s)", result.reports.len());
        self.monitor.log_phase("Transform");

        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("📁 Output saved to: {}", output_path);
        let last = self.monitor.log_phase("Load");
        self.monitor.log_summary(last.as_ref());

        Ok(RunOutcome {
            output_path,
            reports: result.reports,
        })
    }
}
