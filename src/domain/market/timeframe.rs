use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed candle width in whole minutes, always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeframe {
    minutes: u32,
}

impl Timeframe {
    pub const FIFTEEN_MIN: Timeframe = Timeframe { minutes: 15 };

    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes == 0 {
            return Err(anyhow!("Candle interval must be a positive number of minutes"));
        }
        Ok(Self { minutes })
    }

    /// Returns the duration of this timeframe in minutes
    pub fn to_minutes(&self) -> u32 {
        self.minutes
    }

    /// Returns the duration in seconds
    pub fn to_seconds(&self) -> i64 {
        i64::from(self.minutes) * 60
    }

    /// Returns the start (Unix seconds) of the bucket containing `timestamp_sec`.
    ///
    /// Buckets are aligned to the epoch, not to the first sample, so the
    /// same instant always lands in the same bucket.
    pub fn period_start(&self, timestamp_sec: i64) -> i64 {
        let period = self.to_seconds();
        timestamp_sec.div_euclid(period) * period
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::FIFTEEN_MIN
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let digits = lower
            .strip_suffix("min")
            .or_else(|| lower.strip_suffix('m'))
            .unwrap_or(&lower);

        let minutes = digits.trim().parse::<u32>().map_err(|_| {
            anyhow!(
                "Invalid timeframe: '{}'. Expected minutes such as 5, 15m or 30min",
                s
            )
        })?;
        Timeframe::from_minutes(minutes)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_minutes() {
        assert!(Timeframe::from_minutes(0).is_err());
        assert_eq!(Timeframe::from_minutes(5).unwrap().to_seconds(), 300);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Timeframe::from_str("15").unwrap().to_minutes(), 15);
        assert_eq!(Timeframe::from_str("5m").unwrap().to_minutes(), 5);
        assert_eq!(Timeframe::from_str("30Min").unwrap().to_minutes(), 30);
        assert!(Timeframe::from_str("0").is_err());
        assert!(Timeframe::from_str("fifteen").is_err());
        assert!(Timeframe::from_str("-5").is_err());
    }

    #[test]
    fn test_period_start() {
        let tf = Timeframe::from_minutes(15).unwrap();
        // 2024-01-01 00:00:00 UTC
        let base = 1_704_067_200i64;

        assert_eq!(tf.period_start(base), base);
        assert_eq!(tf.period_start(base + 14 * 60 + 59), base);
        assert_eq!(tf.period_start(base + 15 * 60), base + 15 * 60);
        assert_eq!(tf.period_start(base + 31 * 60), base + 30 * 60);
    }

    #[test]
    fn test_period_start_before_epoch() {
        let tf = Timeframe::from_minutes(1).unwrap();
        assert_eq!(tf.period_start(-1), -60);
        assert_eq!(tf.period_start(-60), -60);
    }

    #[test]
    fn test_display() {
        assert_eq!(Timeframe::default().to_string(), "15min");
    }
}
