use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives the three pipeline phases and reports progress.
pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitoring_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitoring_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Extracting track points...");
        let raw_points = self.pipeline.extract().await?;
        tracing::info!("Extracted {} track points", raw_points.len());
        self.monitor.log_stats("Extract");

        tracing::info!("Analyzing track...");
        let result = self.pipeline.transform(raw_points).await?;
        tracing::info!(
            "Found {} stops, route simplified to {} points",
            result.stops.len(),
            result.route.len()
        );
        self.monitor.log_stats("Transform");

        tracing::info!("Writing outputs...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
