//! Strategy configuration parsing from environment variables.
//!
//! Candle width, volatility gate, strike rounding and the session clock.

use crate::application::pipeline::DEFAULT_STRIKE_STEP;
use crate::application::strategies::breakout::DEFAULT_VOLATILITY_THRESHOLD;
use crate::domain::market::session::{SessionClock, parse_session_time};
use crate::domain::market::timeframe::Timeframe;
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Strategy environment configuration
#[derive(Debug, Clone, Copy)]
pub struct StrategyEnvConfig {
    pub candle_timeframe: Timeframe,
    /// Volatility must be strictly above this for signals to be produced
    pub volatility_threshold: Decimal,
    pub strike_step: Decimal,
    pub session_clock: SessionClock,
}

impl Default for StrategyEnvConfig {
    fn default() -> Self {
        Self {
            candle_timeframe: Timeframe::default(),
            volatility_threshold: DEFAULT_VOLATILITY_THRESHOLD,
            strike_step: DEFAULT_STRIKE_STEP,
            session_clock: SessionClock::default(),
        }
    }
}

impl StrategyEnvConfig {
    pub fn from_env() -> Result<Self> {
        let candle_timeframe = match env::var("CANDLE_INTERVAL_MINUTES") {
            Ok(raw) => Timeframe::from_str(&raw).context("Invalid CANDLE_INTERVAL_MINUTES")?,
            Err(_) => Timeframe::default(),
        };

        let volatility_threshold = parse_decimal_var("VOLATILITY_THRESHOLD")?
            .unwrap_or(DEFAULT_VOLATILITY_THRESHOLD);

        let strike_step = parse_decimal_var("STRIKE_STEP")?.unwrap_or(DEFAULT_STRIKE_STEP);
        if strike_step <= Decimal::ZERO {
            bail!("STRIKE_STEP must be positive, got {}", strike_step);
        }

        let open = match env::var("SESSION_OPEN_TIME") {
            Ok(raw) => parse_session_time(&raw)?,
            Err(_) => SessionClock::default().open,
        };
        let utc_offset_minutes = env::var("SESSION_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "0".to_string())
            .trim()
            .parse::<i32>()
            .context("Failed to parse SESSION_UTC_OFFSET_MINUTES")?;
        let session_clock = SessionClock::new(open, utc_offset_minutes)?;

        Ok(Self {
            candle_timeframe,
            volatility_threshold,
            strike_step,
            session_clock,
        })
    }
}

fn parse_decimal_var(name: &str) -> Result<Option<Decimal>> {
    match env::var(name) {
        Ok(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .with_context(|| format!("Failed to parse {}", name)),
        Err(_) => Ok(None),
    }
}
