use crate::domain::ports::{FetchOutcome, IndexDataSource};
use crate::domain::trading::types::{RawPoint, VolatilityReading};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use tracing::info;

/// Minutes from 09:15 to 15:30 inclusive.
const SESSION_MINUTES: i64 = 375;

#[derive(Debug, Clone)]
enum MockFeed {
    /// Seeded random walk through one trading session
    Simulated {
        seed: u64,
        start_price: Decimal,
        session_date: NaiveDate,
    },
    Fixed(Vec<RawPoint>),
    Unavailable,
}

/// Offline stand-in for the exchange feed.
#[derive(Debug, Clone)]
pub struct MockIndexDataSource {
    feed: MockFeed,
    volatility: Option<VolatilityReading>,
}

impl MockIndexDataSource {
    pub fn simulated(seed: u64, vix: Decimal) -> Self {
        Self {
            feed: MockFeed::Simulated {
                seed,
                start_price: dec!(22400),
                session_date: NaiveDate::from_ymd_opt(2024, 4, 25).unwrap_or_default(),
            },
            volatility: Some(VolatilityReading::new(vix, vix - dec!(0.45))),
        }
    }

    pub fn fixed(points: Vec<RawPoint>, volatility: VolatilityReading) -> Self {
        Self {
            feed: MockFeed::Fixed(points),
            volatility: Some(volatility),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            feed: MockFeed::Unavailable,
            volatility: None,
        }
    }

    pub fn without_volatility(mut self) -> Self {
        self.volatility = None;
        self
    }

    fn simulate(seed: u64, start_price: Decimal, session_date: NaiveDate) -> Vec<RawPoint> {
        let mut rng = StdRng::seed_from_u64(seed);
        // Feed timestamps carry exchange wall time, as the NSE chart API does
        let open_ts = session_date
            .and_time(NaiveTime::from_hms_opt(9, 15, 0).unwrap_or_default())
            .and_utc()
            .timestamp();
        let mut price = start_price;

        (0..=SESSION_MINUTES)
            .map(|minute| {
                let step = Decimal::from_f64(rng.random_range(-18.0..18.0))
                    .unwrap_or_default()
                    .round_dp(2);
                price += step;
                RawPoint::new(open_ts + minute * 60, price)
            })
            .collect()
    }
}

#[async_trait]
impl IndexDataSource for MockIndexDataSource {
    async fn fetch_spot_series(&self) -> FetchOutcome<Vec<RawPoint>> {
        match &self.feed {
            MockFeed::Simulated {
                seed,
                start_price,
                session_date,
            } => {
                let points = Self::simulate(*seed, *start_price, *session_date);
                info!(
                    "MockIndexDataSource: simulated {} points (seed {})",
                    points.len(),
                    seed
                );
                FetchOutcome::Available(points)
            }
            MockFeed::Fixed(points) => FetchOutcome::Available(points.clone()),
            MockFeed::Unavailable => FetchOutcome::unavailable("mock feed disabled"),
        }
    }

    async fn fetch_volatility(&self) -> FetchOutcome<VolatilityReading> {
        match self.volatility {
            Some(reading) => FetchOutcome::Available(reading),
            None => FetchOutcome::unavailable("mock volatility disabled"),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
