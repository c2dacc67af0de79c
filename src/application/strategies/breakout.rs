use crate::domain::market::session::SessionClock;
use crate::domain::trading::types::{
    Advisory, Candle, OptionSide, ScanOutcome, SessionLevels, Signal,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

/// Default volatility gate; the index must trade strictly above it.
pub const DEFAULT_VOLATILITY_THRESHOLD: Decimal = dec!(15.0);

/// Breakout Scanner
///
/// Walks adjacent candle pairs looking for:
/// - a close above resistance after a bar that opened at or below it (buy call)
/// - a close below support after a bar that opened at or above it (buy put)
///
/// Nothing is emitted unless volatility exceeds the gate threshold.
#[derive(Debug, Clone)]
pub struct BreakoutScanner {
    pub volatility_threshold: Decimal,
    clock: SessionClock,
}

impl BreakoutScanner {
    pub fn new(volatility_threshold: Decimal, clock: SessionClock) -> Self {
        Self {
            volatility_threshold,
            clock,
        }
    }

    pub fn gate_open(&self, volatility: Decimal) -> bool {
        volatility > self.volatility_threshold
    }

    pub fn scan(
        &self,
        candles: &[Candle],
        levels: &SessionLevels,
        volatility: Decimal,
        strike: Decimal,
    ) -> ScanOutcome {
        if !self.gate_open(volatility) {
            info!(
                "BreakoutScanner: volatility {} <= {}, signals suppressed",
                volatility, self.volatility_threshold
            );
            return ScanOutcome::Advisory(Advisory::LowVolatility {
                current: volatility,
                threshold: self.volatility_threshold,
            });
        }

        let calls = self.scan_side(candles, OptionSide::Call, strike, levels.support, |prev, curr| {
            prev.open <= levels.resistance && curr.close > levels.resistance
        });
        let puts = self.scan_side(candles, OptionSide::Put, strike, levels.resistance, |prev, curr| {
            prev.open >= levels.support && curr.close < levels.support
        });

        info!(
            "BreakoutScanner: {} call / {} put signal(s) over {} candles",
            calls.len(),
            puts.len(),
            candles.len()
        );

        ScanOutcome::Signals { calls, puts }
    }

    fn scan_side<F>(
        &self,
        candles: &[Candle],
        side: OptionSide,
        strike: Decimal,
        stop_loss: Decimal,
        triggered: F,
    ) -> Vec<Signal>
    where
        F: Fn(&Candle, &Candle) -> bool,
    {
        candles
            .windows(2)
            .filter(|pair| triggered(&pair[0], &pair[1]))
            .map(|pair| Signal {
                side,
                timestamp: pair[1].timestamp,
                time: self.clock.time_of_day(pair[1].timestamp),
                strike_price: strike,
                stop_loss,
            })
            .collect()
    }
}

impl Default for BreakoutScanner {
    fn default() -> Self {
        Self::new(DEFAULT_VOLATILITY_THRESHOLD, SessionClock::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trading::types::LevelBasis;

    fn mock_candle(timestamp: i64, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Candle {
        Candle {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    fn levels(resistance: Decimal, support: Decimal) -> SessionLevels {
        SessionLevels {
            open: dec!(100),
            resistance,
            support,
            anchor_timestamp: 0,
            basis: LevelBasis::FirstCandle,
        }
    }

    fn breakout_pair() -> Vec<Candle> {
        vec![
            mock_candle(0, dec!(100), dec!(105), dec!(95), dec!(102)),
            mock_candle(900, dec!(103), dec!(110), dec!(101), dec!(108)),
        ]
    }

    #[test]
    fn test_gate_is_exclusive() {
        let scanner = BreakoutScanner::default();
        let outcome = scanner.scan(&breakout_pair(), &levels(dec!(105), dec!(95)), dec!(15.0), dec!(100));
        assert_eq!(
            outcome,
            ScanOutcome::Advisory(Advisory::LowVolatility {
                current: dec!(15.0),
                threshold: dec!(15.0)
            })
        );

        let outcome = scanner.scan(&breakout_pair(), &levels(dec!(105), dec!(95)), dec!(15.01), dec!(100));
        assert!(!outcome.is_advisory());
    }

    #[test]
    fn test_bullish_breakout() {
        let scanner = BreakoutScanner::default();
        let outcome = scanner.scan(&breakout_pair(), &levels(dec!(105), dec!(95)), dec!(18), dec!(100));

        assert_eq!(outcome.calls().len(), 1);
        let sig = outcome.calls()[0];
        assert_eq!(sig.side, OptionSide::Call);
        assert_eq!(sig.timestamp, 900);
        assert_eq!(sig.time, chrono::NaiveTime::from_hms_opt(0, 15, 0).unwrap());
        assert_eq!(sig.strike_price, dec!(100));
        assert_eq!(sig.stop_loss, dec!(95));
        assert!(outcome.puts().is_empty());
    }

    #[test]
    fn test_no_breakout_below_resistance() {
        let scanner = BreakoutScanner::default();
        let outcome = scanner.scan(&breakout_pair(), &levels(dec!(120), dec!(95)), dec!(18), dec!(100));
        assert!(outcome.calls().is_empty());
        assert!(outcome.puts().is_empty());
    }

    #[test]
    fn test_bearish_breakdown() {
        let scanner = BreakoutScanner::default();
        let candles = vec![
            mock_candle(0, dec!(100), dec!(105), dec!(95), dec!(98)),
            mock_candle(900, dec!(97), dec!(98), dec!(90), dec!(92)),
        ];
        let outcome = scanner.scan(&candles, &levels(dec!(105), dec!(95)), dec!(18), dec!(100));

        assert!(outcome.calls().is_empty());
        assert_eq!(outcome.puts().len(), 1);
        let sig = outcome.puts()[0];
        assert_eq!(sig.side, OptionSide::Put);
        assert_eq!(sig.timestamp, 900);
        assert_eq!(sig.stop_loss, dec!(105));
    }

    #[test]
    fn test_prior_open_above_resistance_does_not_trigger() {
        let scanner = BreakoutScanner::default();
        let candles = vec![
            mock_candle(0, dec!(106), dec!(109), dec!(104), dec!(107)),
            mock_candle(900, dec!(107), dec!(112), dec!(106), dec!(111)),
        ];
        let outcome = scanner.scan(&candles, &levels(dec!(105), dec!(95)), dec!(18), dec!(100));
        assert!(outcome.calls().is_empty());
    }

    #[test]
    fn test_scans_are_independent() {
        // Wide swing: closes above resistance, then below support, then above again
        let scanner = BreakoutScanner::default();
        let candles = vec![
            mock_candle(0, dec!(100), dec!(105), dec!(95), dec!(100)),
            mock_candle(900, dec!(100), dec!(108), dec!(99), dec!(107)),
            mock_candle(1800, dec!(100), dec!(101), dec!(90), dec!(91)),
            mock_candle(2700, dec!(92), dec!(107), dec!(91), dec!(106)),
        ];
        let outcome = scanner.scan(&candles, &levels(dec!(105), dec!(95)), dec!(20), dec!(100));

        let call_times: Vec<i64> = outcome.calls().iter().map(|s| s.timestamp).collect();
        let put_times: Vec<i64> = outcome.puts().iter().map(|s| s.timestamp).collect();
        assert_eq!(call_times, vec![900, 2700]);
        assert_eq!(put_times, vec![1800]);
    }

    #[test]
    fn test_single_candle_yields_no_signals() {
        let scanner = BreakoutScanner::default();
        let candles = vec![mock_candle(0, dec!(100), dec!(120), dec!(80), dec!(119))];
        let outcome = scanner.scan(&candles, &levels(dec!(105), dec!(95)), dec!(20), dec!(100));
        assert_eq!(
            outcome,
            ScanOutcome::Signals {
                calls: vec![],
                puts: vec![]
            }
        );
    }
}
