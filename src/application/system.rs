use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::pipeline::SessionPipeline;
use crate::config::Config;
use crate::domain::errors::PipelineError;
use crate::domain::trading::types::SessionReport;
use crate::infrastructure::factory::DataSourceFactory;

/// Wires the configured data source into a session pipeline.
///
/// Cheap to clone; every clone shares the same source (and its HTTP session).
#[derive(Clone)]
pub struct Application {
    pub config: Config,
    pipeline: Arc<SessionPipeline>,
}

impl Application {
    pub fn build(config: Config) -> Result<Self> {
        info!("Building Strikedesk Application (Mode: {:?})...", config.mode);

        let source = DataSourceFactory::create(&config)?;
        let pipeline = Arc::new(SessionPipeline::new(source, config.pipeline_settings()));

        info!(
            "Application ready: {} candles, volatility gate > {}, strike step {}",
            config.candle_timeframe, config.volatility_threshold, config.strike_step
        );

        Ok(Self { config, pipeline })
    }

    pub fn pipeline(&self) -> Arc<SessionPipeline> {
        self.pipeline.clone()
    }

    /// Runs one fetch → scan pass.
    pub async fn run_once(&self) -> Result<SessionReport, PipelineError> {
        let result = self.pipeline.run().await;
        match &result {
            Ok(report) => info!(
                "Run complete: {} candle(s), {} call(s), {} put(s){}",
                report.candles.len(),
                report.outcome.calls().len(),
                report.outcome.puts().len(),
                if report.outcome.is_advisory() {
                    " [advisory]"
                } else {
                    ""
                }
            ),
            Err(e) => warn!("Run failed: {}", e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_application_runs() {
        let app = Application::build(Config::mock()).unwrap();
        assert_eq!(app.pipeline().source_name(), "mock");

        let report = app.run_once().await.unwrap();
        // 09:15 through 15:30 in 15 minute buckets
        assert_eq!(report.candles.len(), 26);
        assert!(report.volatility.is_some());
    }
}
