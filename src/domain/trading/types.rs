use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single index sample as delivered by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPoint {
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub value: Decimal,
}

impl RawPoint {
    pub fn new(timestamp: i64, value: Decimal) -> Self {
        Self { timestamp, value }
    }
}

/// OHLC summary of every sample inside one bucket.
///
/// Only `low <= min(open, close)` and `high >= max(open, close)` hold;
/// open and close are the literal first and last samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start, Unix seconds
    pub timestamp: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Which candle the session levels were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelBasis {
    /// Bucket start matched the declared session open time
    SessionOpen,
    /// No bucket matched; first candle of the sequence was used
    FirstCandle,
}

impl fmt::Display for LevelBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelBasis::SessionOpen => write!(f, "session open"),
            LevelBasis::FirstCandle => write!(f, "first candle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLevels {
    pub open: Decimal,
    pub resistance: Decimal,
    pub support: Decimal,
    /// Bucket start of the candle the levels were taken from
    pub anchor_timestamp: i64,
    pub basis: LevelBasis,
}

impl SessionLevels {
    /// Rounds the session open down to the nearest multiple of `step`.
    ///
    /// Returns the open unchanged if `step` is not positive.
    pub fn strike_price(&self, step: Decimal) -> Decimal {
        if step <= Decimal::ZERO {
            return self.open;
        }
        (self.open / step).floor() * step
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatilityReading {
    pub current: Decimal,
    pub previous_close: Decimal,
}

impl VolatilityReading {
    pub fn new(current: Decimal, previous_close: Decimal) -> Self {
        Self {
            current,
            previous_close,
        }
    }

    /// Point change against the previous session close
    pub fn change(&self) -> Decimal {
        self.current - self.previous_close
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    Call,
    Put,
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Call => write!(f, "CALL"),
            OptionSide::Put => write!(f, "PUT"),
        }
    }
}

/// A buy recommendation for one option side, valid for a single render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub side: OptionSide,
    /// Bucket start of the triggering candle, Unix seconds
    pub timestamp: i64,
    /// Time of day of the triggering candle in the session clock
    pub time: NaiveTime,
    pub strike_price: Decimal,
    pub stop_loss: Decimal,
}

/// Why the scanner declined to produce signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    LowVolatility {
        current: Decimal,
        threshold: Decimal,
    },
    VolatilityUnavailable,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::LowVolatility { .. } => write!(
                f,
                "Disclaimer: Market lacks volatility. Investment in Options is not advisable. Refrain from executing trades."
            ),
            Advisory::VolatilityUnavailable => write!(
                f,
                "Volatility data unavailable. Signals are withheld until a reading can be fetched."
            ),
        }
    }
}

/// Result of one breakout scan: either both signal tables or an advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    Signals { calls: Vec<Signal>, puts: Vec<Signal> },
    Advisory(Advisory),
}

impl ScanOutcome {
    pub fn is_advisory(&self) -> bool {
        matches!(self, ScanOutcome::Advisory(_))
    }

    pub fn calls(&self) -> &[Signal] {
        match self {
            ScanOutcome::Signals { calls, .. } => calls,
            ScanOutcome::Advisory(_) => &[],
        }
    }

    pub fn puts(&self) -> &[Signal] {
        match self {
            ScanOutcome::Signals { puts, .. } => puts,
            ScanOutcome::Advisory(_) => &[],
        }
    }
}

/// Latest spot print relative to the session open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotSummary {
    pub current: Decimal,
    /// `None` when the session open is zero
    pub change_pct: Option<Decimal>,
}

impl SpotSummary {
    pub fn from_open(current: Decimal, open: Decimal) -> Self {
        let change_pct = if open.is_zero() {
            None
        } else {
            Some((current - open) * Decimal::ONE_HUNDRED / open)
        };
        Self {
            current,
            change_pct,
        }
    }
}

/// Everything one pipeline run hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub candles: Vec<Candle>,
    pub levels: SessionLevels,
    pub strike_price: Decimal,
    pub spot: SpotSummary,
    pub volatility: Option<VolatilityReading>,
    pub outcome: ScanOutcome,
}
