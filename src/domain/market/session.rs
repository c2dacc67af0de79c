//! Session clock: maps feed timestamps onto the exchange's wall clock.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Declared session open time plus the fixed offset of the exchange clock.
///
/// The NSE intraday chart feed already encodes exchange-local wall time in
/// its epoch values, so the default offset is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    pub open: NaiveTime,
    pub utc_offset_minutes: i32,
}

impl SessionClock {
    pub fn new(open: NaiveTime, utc_offset_minutes: i32) -> Result<Self> {
        if FixedOffset::east_opt(utc_offset_minutes * 60).is_none() {
            return Err(anyhow!(
                "Invalid session UTC offset: {} minutes",
                utc_offset_minutes
            ));
        }
        Ok(Self {
            open,
            utc_offset_minutes,
        })
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Wall-clock date and time of a Unix-seconds timestamp.
    pub fn local_datetime(&self, timestamp_sec: i64) -> Option<NaiveDateTime> {
        let utc = DateTime::from_timestamp(timestamp_sec, 0)?;
        Some(self.offset().from_utc_datetime(&utc.naive_utc()).naive_local())
    }

    /// Wall-clock time of day, falling back to midnight for out-of-range input.
    pub fn time_of_day(&self, timestamp_sec: i64) -> NaiveTime {
        self.local_datetime(timestamp_sec)
            .map(|dt| dt.time())
            .unwrap_or(NaiveTime::MIN)
    }

    pub fn is_session_open(&self, timestamp_sec: i64) -> bool {
        self.time_of_day(timestamp_sec) == self.open
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 15, 0).expect("09:15 is a valid time"),
            utc_offset_minutes: 0,
        }
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_session_time(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .with_context(|| format!("Invalid session time '{}', expected HH:MM[:SS]", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-04-25 09:15:00 as encoded by the chart feed
    const OPEN_TS: i64 = 1_714_036_500;

    #[test]
    fn test_default_open_matches_feed_time() {
        let clock = SessionClock::default();
        assert!(clock.is_session_open(OPEN_TS));
        assert!(!clock.is_session_open(OPEN_TS + 900));
    }

    #[test]
    fn test_offset_shifts_time_of_day() {
        let clock = SessionClock::new(NaiveTime::from_hms_opt(14, 45, 0).unwrap(), 330).unwrap();
        // 09:15 UTC + 5h30 = 14:45 local
        assert!(clock.is_session_open(OPEN_TS));
    }

    #[test]
    fn test_rejects_out_of_range_offset() {
        assert!(SessionClock::new(NaiveTime::MIN, 24 * 60).is_err());
    }

    #[test]
    fn test_parse_session_time() {
        assert_eq!(
            parse_session_time("09:15").unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
        assert_eq!(
            parse_session_time(" 09:15:30 ").unwrap(),
            NaiveTime::from_hms_opt(9, 15, 30).unwrap()
        );
        assert!(parse_session_time("9.15am").is_err());
    }
}
