//! Data source configuration parsing from environment variables.
//!
//! Covers the NSE website API and the offline mock feed.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

/// NSE API configuration
#[derive(Debug, Clone)]
pub struct NseConfig {
    pub base_url: String,
    pub index: String,
    pub request_timeout_secs: u64,
    pub session_timeout_secs: u64,
    pub max_retries: u32,
    pub vix_lookback_days: u32,
}

impl Default for NseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com".to_string(),
            index: "NIFTY 50".to_string(),
            request_timeout_secs: 5,
            session_timeout_secs: 15,
            max_retries: 1,
            vix_lookback_days: 10,
        }
    }
}

impl NseConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            base_url: env::var("NSE_BASE_URL").unwrap_or(defaults.base_url),
            index: env::var("NSE_INDEX").unwrap_or(defaults.index),
            request_timeout_secs: parse_var("NSE_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            session_timeout_secs: parse_var("NSE_SESSION_TIMEOUT_SECS", defaults.session_timeout_secs)?,
            max_retries: parse_var("NSE_MAX_RETRIES", defaults.max_retries)?,
            vix_lookback_days: parse_var("VIX_LOOKBACK_DAYS", defaults.vix_lookback_days)?,
        })
    }
}

/// Mock feed configuration
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub vix: Decimal,
    pub seed: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            vix: dec!(16.5),
            seed: 42,
        }
    }
}

impl MockConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let vix = match env::var("MOCK_VIX") {
            Ok(raw) => Decimal::from_str(raw.trim()).context("Failed to parse MOCK_VIX")?,
            Err(_) => defaults.vix,
        };
        Ok(Self {
            vix,
            seed: parse_var("MOCK_SEED", defaults.seed)?,
        })
    }
}

/// Aggregated data source configuration
#[derive(Debug, Clone, Default)]
pub struct SourceEnvConfig {
    pub nse: NseConfig,
    pub mock: MockConfig,
}

impl SourceEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            nse: NseConfig::from_env()?,
            mock: MockConfig::from_env()?,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}", name)),
        Err(_) => Ok(default),
    }
}
