use rust_decimal_macros::dec;
use std::sync::Arc;
use strikedesk::application::pipeline::{PipelineSettings, SessionPipeline};
use strikedesk::application::system::Application;
use strikedesk::config::Config;
use strikedesk::domain::errors::PipelineError;
use strikedesk::domain::trading::types::{Advisory, LevelBasis, RawPoint, ScanOutcome, VolatilityReading};
use strikedesk::infrastructure::mock::MockIndexDataSource;

// 2024-04-25 09:15:00 in feed time
const OPEN_TS: i64 = 1_714_036_500;

/// Pre-open bucket at 09:00, then the 09:15 open bucket and a breakdown at 09:30.
fn session_points() -> Vec<RawPoint> {
    vec![
        RawPoint::new(OPEN_TS - 600, dec!(22510)),
        RawPoint::new(OPEN_TS - 300, dec!(22490)),
        RawPoint::new(OPEN_TS, dec!(22437.6)),
        RawPoint::new(OPEN_TS + 300, dec!(22480)),
        RawPoint::new(OPEN_TS + 600, dec!(22410)),
        RawPoint::new(OPEN_TS + 840, dec!(22425)),
        RawPoint::new(OPEN_TS + 900, dec!(22420)),
        RawPoint::new(OPEN_TS + 1200, dec!(22380)),
        RawPoint::new(OPEN_TS + 1700, dec!(22395.5)),
    ]
}

fn pipeline(source: MockIndexDataSource) -> SessionPipeline {
    SessionPipeline::new(Arc::new(source), PipelineSettings::default())
}

#[tokio::test]
async fn test_levels_come_from_session_open_candle() {
    let source =
        MockIndexDataSource::fixed(session_points(), VolatilityReading::new(dec!(17), dec!(16)));
    let report = pipeline(source).run().await.unwrap();

    assert_eq!(report.candles.len(), 3);
    assert_eq!(report.levels.basis, LevelBasis::SessionOpen);
    assert_eq!(report.levels.anchor_timestamp, OPEN_TS);
    assert_eq!(report.levels.open, dec!(22437.6));
    assert_eq!(report.levels.resistance, dec!(22480));
    assert_eq!(report.levels.support, dec!(22410));
    assert_eq!(report.strike_price, dec!(22400));
    assert_eq!(report.spot.current, dec!(22395.5));

    // 09:15 opened above support, 09:30 closed below it
    assert!(report.outcome.calls().is_empty());
    let puts = report.outcome.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].timestamp, OPEN_TS + 900);
    assert_eq!(puts[0].stop_loss, dec!(22480));
    assert_eq!(puts[0].strike_price, dec!(22400));
}

#[tokio::test]
async fn test_low_volatility_reports_advisory_with_levels() {
    let source = MockIndexDataSource::fixed(
        session_points(),
        VolatilityReading::new(dec!(15.0), dec!(15.4)),
    );
    let report = pipeline(source).run().await.unwrap();

    assert_eq!(
        report.outcome,
        ScanOutcome::Advisory(Advisory::LowVolatility {
            current: dec!(15.0),
            threshold: dec!(15.0),
        })
    );
    assert_eq!(report.candles.len(), 3);
    assert_eq!(report.levels.resistance, dec!(22480));
    assert_eq!(report.volatility.map(|v| v.change()), Some(dec!(-0.4)));
}

#[tokio::test]
async fn test_missing_volatility_withholds_signals() {
    let source =
        MockIndexDataSource::fixed(session_points(), VolatilityReading::new(dec!(20), dec!(19)))
            .without_volatility();
    let report = pipeline(source).run().await.unwrap();

    assert_eq!(
        report.outcome,
        ScanOutcome::Advisory(Advisory::VolatilityUnavailable)
    );
    assert!(report.volatility.is_none());
    assert_eq!(report.levels.support, dec!(22410));
}

#[tokio::test]
async fn test_unavailable_spot_is_reported() {
    let err = pipeline(MockIndexDataSource::unavailable())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::DataUnavailable { .. }));
}

#[tokio::test]
async fn test_out_of_order_feed() {
    let mut points = session_points();
    points.reverse();
    let source = MockIndexDataSource::fixed(points, VolatilityReading::new(dec!(17), dec!(16)));
    let report = pipeline(source).run().await.unwrap();

    assert!(
        report
            .candles
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp)
    );
    assert_eq!(report.levels.anchor_timestamp, OPEN_TS);
}

#[tokio::test]
async fn test_runs_are_independent() {
    let app = Application::build(Config::mock()).unwrap();

    let first = app.run_once().await.unwrap();
    let second = app.run_once().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.levels.basis, LevelBasis::SessionOpen);
}
