use crate::domain::market::timeframe::Timeframe;
use crate::domain::trading::types::{Candle, RawPoint};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug)]
struct CandleBuilder {
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    start_time: i64,
    tick_count: u32,
}

impl CandleBuilder {
    fn new(price: Decimal, start_time: i64) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            start_time,
            tick_count: 1,
        }
    }

    fn update(&mut self, price: Decimal) {
        self.tick_count += 1;

        if price > self.high {
            self.high = price;
        }
        if price < self.low {
            self.low = price;
        }
        self.close = price;
    }

    fn build(&self) -> Candle {
        Candle {
            timestamp: self.start_time,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
        }
    }
}

/// Resamples a raw index series into fixed-width OHLC candles.
#[derive(Debug, Clone, Copy)]
pub struct CandleAggregator {
    timeframe: Timeframe,
}

impl CandleAggregator {
    pub fn new(timeframe: Timeframe) -> Self {
        Self { timeframe }
    }

    /// Builds one candle per non-empty bucket, ordered by bucket start.
    ///
    /// Within a bucket, open and close follow the order of `points`. Buckets
    /// without samples are skipped, and empty input yields no candles.
    pub fn aggregate(&self, points: &[RawPoint]) -> Vec<Candle> {
        let mut builders: BTreeMap<i64, CandleBuilder> = BTreeMap::new();

        for point in points {
            let bucket = self.timeframe.period_start(point.timestamp);
            builders
                .entry(bucket)
                .and_modify(|builder| builder.update(point.value))
                .or_insert_with(|| CandleBuilder::new(point.value, bucket));
        }

        builders
            .values()
            .map(|builder| {
                let candle = builder.build();
                debug!(
                    "CandleAggregator: {} candle @ {} → O:{} H:{} L:{} C:{} ({} ticks)",
                    self.timeframe,
                    candle.timestamp,
                    candle.open,
                    candle.high,
                    candle.low,
                    candle.close,
                    builder.tick_count
                );
                candle
            })
            .collect()
    }
}

/// Convenience wrapper over [`CandleAggregator::aggregate`].
pub fn aggregate(points: &[RawPoint], timeframe: Timeframe) -> Vec<Candle> {
    CandleAggregator::new(timeframe).aggregate(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn ts(hour: u32, min: u32, sec: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 4, 25, hour, min, sec)
            .unwrap()
            .timestamp()
    }

    fn fifteen() -> Timeframe {
        Timeframe::from_minutes(15).unwrap()
    }

    #[test]
    fn test_candle_aggregation_realistic_prices() {
        let points = vec![
            RawPoint::new(ts(9, 15, 0), dec!(22400.50)),
            RawPoint::new(ts(9, 17, 0), dec!(22452.10)),
            RawPoint::new(ts(9, 22, 0), dec!(22380.25)),
            RawPoint::new(ts(9, 29, 59), dec!(22410.00)),
            // next bucket
            RawPoint::new(ts(9, 30, 0), dec!(22415.40)),
            RawPoint::new(ts(9, 44, 0), dec!(22390.00)),
        ];

        let candles = aggregate(&points, fifteen());
        assert_eq!(candles.len(), 2);

        let first = candles[0];
        assert_eq!(first.timestamp, ts(9, 15, 0));
        assert_eq!(first.open, dec!(22400.50));
        assert_eq!(first.high, dec!(22452.10));
        assert_eq!(first.low, dec!(22380.25));
        assert_eq!(first.close, dec!(22410.00));

        let second = candles[1];
        assert_eq!(second.timestamp, ts(9, 30, 0));
        assert_eq!(second.open, dec!(22415.40));
        assert_eq!(second.close, dec!(22390.00));
        assert_eq!(second.high, dec!(22415.40));
        assert_eq!(second.low, dec!(22390.00));
    }

    #[test]
    fn test_empty_input_yields_no_candles() {
        assert!(aggregate(&[], fifteen()).is_empty());
    }

    #[test]
    fn test_buckets_align_to_absolute_time() {
        // First sample mid-bucket: bucket still starts on the quarter hour
        let points = vec![RawPoint::new(ts(9, 21, 13), dec!(100))];
        let candles = aggregate(&points, fifteen());
        assert_eq!(candles[0].timestamp, ts(9, 15, 0));
    }

    #[test]
    fn test_gaps_are_not_forward_filled() {
        let points = vec![
            RawPoint::new(ts(9, 15, 0), dec!(100)),
            RawPoint::new(ts(10, 5, 0), dec!(104)),
        ];
        let candles = aggregate(&points, fifteen());
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp, ts(9, 15, 0));
        assert_eq!(candles[1].timestamp, ts(10, 0, 0));
    }

    #[test]
    fn test_duplicate_timestamps_are_retained() {
        let t = ts(9, 15, 0);
        let points = vec![
            RawPoint::new(t, dec!(100)),
            RawPoint::new(t, dec!(98)),
            RawPoint::new(t, dec!(101)),
        ];
        let candles = aggregate(&points, fifteen());
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open, dec!(100));
        assert_eq!(candles[0].low, dec!(98));
        assert_eq!(candles[0].high, dec!(101));
        assert_eq!(candles[0].close, dec!(101));
    }

    #[test]
    fn test_out_of_order_points_still_sorted_by_bucket() {
        let points = vec![
            RawPoint::new(ts(9, 45, 0), dec!(105)),
            RawPoint::new(ts(9, 15, 0), dec!(100)),
            RawPoint::new(ts(9, 46, 0), dec!(103)),
        ];
        let candles = aggregate(&points, fifteen());
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp, ts(9, 15, 0));
        assert_eq!(candles[1].timestamp, ts(9, 45, 0));
        assert_eq!(candles[1].open, dec!(105));
        assert_eq!(candles[1].close, dec!(103));
    }

    #[test]
    fn test_ohlc_envelope_and_strict_ordering() {
        // Pseudo-random walk across several hours of one-minute samples
        let mut price = dec!(22000);
        let mut points = Vec::new();
        for i in 0..375i64 {
            let step = Decimal::from((i * 37 % 23) - 11);
            price += step;
            points.push(RawPoint::new(ts(9, 15, 0) + i * 60, price));
        }

        for minutes in [1u32, 5, 15, 60] {
            let candles = aggregate(&points, Timeframe::from_minutes(minutes).unwrap());
            assert!(!candles.is_empty());
            for c in &candles {
                assert!(c.high >= c.open.max(c.close));
                assert!(c.low <= c.open.min(c.close));
            }
            for pair in candles.windows(2) {
                assert!(pair[0].timestamp < pair[1].timestamp);
            }
        }
    }
}
