//! Configuration module for Strikedesk.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by domain: data Source and Strategy.

mod source_config;
mod strategy_config;

pub use source_config::{MockConfig, NseConfig, SourceEnvConfig};
pub use strategy_config::StrategyEnvConfig;

use crate::application::pipeline::PipelineSettings;
use crate::domain::market::session::SessionClock;
use crate::domain::market::timeframe::Timeframe;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Where market data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Mock,
    Nse,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "nse" => Ok(Mode::Nse),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'mock' or 'nse'", s),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,

    // Source (from SourceEnvConfig)
    pub nse_base_url: String,
    pub nse_index: String,
    pub nse_request_timeout: Duration,
    pub nse_session_timeout: Duration,
    pub nse_max_retries: u32,
    pub vix_lookback_days: u32,
    pub mock_vix: Decimal,
    pub mock_seed: u64,

    // Strategy (from StrategyEnvConfig)
    pub candle_timeframe: Timeframe,
    pub volatility_threshold: Decimal,
    pub strike_step: Decimal,
    pub session_clock: SessionClock,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mode_str = env::var("MODE").unwrap_or_else(|_| "nse".to_string());
        let mode = Mode::from_str(&mode_str)?;

        let source = SourceEnvConfig::from_env().context("Failed to load data source config")?;
        let strategy = StrategyEnvConfig::from_env().context("Failed to load strategy config")?;

        Ok(Self::compose(mode, source, strategy))
    }

    fn compose(mode: Mode, source: SourceEnvConfig, strategy: StrategyEnvConfig) -> Self {
        Self {
            mode,

            nse_base_url: source.nse.base_url,
            nse_index: source.nse.index,
            nse_request_timeout: Duration::from_secs(source.nse.request_timeout_secs),
            nse_session_timeout: Duration::from_secs(source.nse.session_timeout_secs),
            nse_max_retries: source.nse.max_retries,
            vix_lookback_days: source.nse.vix_lookback_days,
            mock_vix: source.mock.vix,
            mock_seed: source.mock.seed,

            candle_timeframe: strategy.candle_timeframe,
            volatility_threshold: strategy.volatility_threshold,
            strike_step: strategy.strike_step,
            session_clock: strategy.session_clock,
        }
    }

    /// Offline configuration backed by the simulated feed.
    pub fn mock() -> Self {
        Self::compose(
            Mode::Mock,
            SourceEnvConfig::default(),
            StrategyEnvConfig::default(),
        )
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            timeframe: self.candle_timeframe,
            volatility_threshold: self.volatility_threshold,
            strike_step: self.strike_step,
            clock: self.session_clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(Mode::from_str("mock").unwrap(), Mode::Mock);
        assert_eq!(Mode::from_str("NSE").unwrap(), Mode::Nse);
        assert!(Mode::from_str("alpaca").is_err());
    }

    #[test]
    fn test_mock_config_defaults() {
        let config = Config::mock();
        assert_eq!(config.mode, Mode::Mock);
        assert_eq!(config.candle_timeframe.to_minutes(), 15);
        assert_eq!(config.volatility_threshold, dec!(15.0));
        assert_eq!(config.strike_step, dec!(50));
        assert_eq!(config.nse_request_timeout, Duration::from_secs(5));

        let settings = config.pipeline_settings();
        assert_eq!(settings, PipelineSettings::default());
    }
}
