//! One-shot session pipeline: fetch → aggregate → levels → scan.
//!
//! Each call to [`SessionPipeline::run`] is independent. Intermediate values
//! are passed explicitly between stages and nothing is cached across runs.

use crate::application::market_data::candle_aggregator::CandleAggregator;
use crate::application::market_data::level_extractor::LevelExtractor;
use crate::application::strategies::breakout::{BreakoutScanner, DEFAULT_VOLATILITY_THRESHOLD};
use crate::domain::errors::PipelineError;
use crate::domain::market::session::SessionClock;
use crate::domain::market::timeframe::Timeframe;
use crate::domain::ports::{FetchOutcome, IndexDataSource};
use crate::domain::trading::types::{Advisory, ScanOutcome, SessionReport, SpotSummary};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{info, warn};

/// Default strike rounding unit for index options.
pub const DEFAULT_STRIKE_STEP: Decimal = dec!(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub timeframe: Timeframe,
    pub volatility_threshold: Decimal,
    pub strike_step: Decimal,
    pub clock: SessionClock,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::default(),
            volatility_threshold: DEFAULT_VOLATILITY_THRESHOLD,
            strike_step: DEFAULT_STRIKE_STEP,
            clock: SessionClock::default(),
        }
    }
}

pub struct SessionPipeline {
    source: Arc<dyn IndexDataSource>,
    settings: PipelineSettings,
    aggregator: CandleAggregator,
    levels: LevelExtractor,
    scanner: BreakoutScanner,
}

impl SessionPipeline {
    pub fn new(source: Arc<dyn IndexDataSource>, settings: PipelineSettings) -> Self {
        Self {
            source,
            settings,
            aggregator: CandleAggregator::new(settings.timeframe),
            levels: LevelExtractor::new(settings.clock),
            scanner: BreakoutScanner::new(settings.volatility_threshold, settings.clock),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn run(&self) -> Result<SessionReport, PipelineError> {
        info!(
            "SessionPipeline: run started (source: {}, interval: {})",
            self.source.name(),
            self.settings.timeframe
        );

        // 1. Spot series
        let points = match self.source.fetch_spot_series().await {
            FetchOutcome::Available(points) => points,
            FetchOutcome::Unavailable(reason) => {
                warn!("SessionPipeline: spot series unavailable: {}", reason);
                return Err(PipelineError::DataUnavailable { reason });
            }
        };
        let Some(last_point) = points.last().copied() else {
            return Err(PipelineError::unavailable("spot series returned no points"));
        };

        // 2. Candles
        let candles = self.aggregator.aggregate(&points);
        if candles.is_empty() {
            return Err(PipelineError::unavailable("no candles could be built"));
        }
        info!(
            "SessionPipeline: {} points → {} candle(s)",
            points.len(),
            candles.len()
        );

        // 3. Levels
        let levels = self.levels.derive(&candles)?;
        let strike_price = levels.strike_price(self.settings.strike_step);
        let spot = SpotSummary::from_open(last_point.value, levels.open);

        // 4. Volatility gate + scan
        let (volatility, outcome) = match self.source.fetch_volatility().await {
            FetchOutcome::Available(reading) => {
                let outcome = self
                    .scanner
                    .scan(&candles, &levels, reading.current, strike_price);
                (Some(reading), outcome)
            }
            FetchOutcome::Unavailable(reason) => {
                warn!(
                    "SessionPipeline: volatility unavailable, withholding signals: {}",
                    reason
                );
                (None, ScanOutcome::Advisory(Advisory::VolatilityUnavailable))
            }
        };

        Ok(SessionReport {
            candles,
            levels,
            strike_price,
            spot,
            volatility,
            outcome,
        })
    }
}
