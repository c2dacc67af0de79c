use crate::domain::errors::PipelineError;
use crate::domain::market::session::SessionClock;
use crate::domain::trading::types::{Candle, LevelBasis, SessionLevels};
use tracing::{info, warn};

/// Derives the session open, resistance and support from the opening candle.
///
/// The opening candle is the first one whose bucket start falls exactly on
/// the declared session open time. When the feed has no such bucket (late
/// start, partial day) the first candle of the sequence is used instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelExtractor {
    clock: SessionClock,
}

impl LevelExtractor {
    pub fn new(clock: SessionClock) -> Self {
        Self { clock }
    }

    pub fn derive(&self, candles: &[Candle]) -> Result<SessionLevels, PipelineError> {
        let first = candles.first().ok_or(PipelineError::InsufficientData {
            needed: 1,
            available: 0,
        })?;

        let (anchor, basis) = match candles
            .iter()
            .find(|c| self.clock.is_session_open(c.timestamp))
        {
            Some(candle) => (candle, LevelBasis::SessionOpen),
            None => {
                warn!(
                    "LevelExtractor: no candle starts at {}, using first candle @ {}",
                    self.clock.open,
                    self.clock.time_of_day(first.timestamp)
                );
                (first, LevelBasis::FirstCandle)
            }
        };

        let levels = SessionLevels {
            open: anchor.open,
            resistance: anchor.high,
            support: anchor.low,
            anchor_timestamp: anchor.timestamp,
            basis,
        };

        info!(
            "LevelExtractor: open {} resistance {} support {} ({})",
            levels.open, levels.resistance, levels.support, levels.basis
        );

        Ok(levels)
    }
}
