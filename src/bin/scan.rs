//! Strikedesk Scan - headless session report
//!
//! Runs the fetch → candles → levels → scan pipeline once and prints the
//! result to stdout. Exit status is non-zero when no data could be fetched.
//!
//! # Usage
//! ```sh
//! cargo run --bin scan -- --mode mock --interval 15 --threshold 15
//! ```
//!
//! Flags override the matching environment variables (`MODE`,
//! `CANDLE_INTERVAL_MINUTES`, `VOLATILITY_THRESHOLD`).

use anyhow::Result;
use clap::Parser;
use rust_decimal::Decimal;
use strikedesk::application::system::Application;
use strikedesk::config::{Config, Mode};
use strikedesk::domain::market::timeframe::Timeframe;
use strikedesk::domain::trading::types::{ScanOutcome, SessionReport, Signal};
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Intraday breakout scan for index options", long_about = None)]
struct Args {
    /// Data source: nse or mock
    #[arg(long)]
    mode: Option<Mode>,

    /// Candle interval, e.g. 15, 5m or 30min
    #[arg(long)]
    interval: Option<Timeframe>,

    /// Volatility gate; signals only when VIX is strictly above it
    #[arg(long)]
    threshold: Option<Decimal>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(interval) = args.interval {
        config.candle_timeframe = interval;
    }
    if let Some(threshold) = args.threshold {
        config.volatility_threshold = threshold;
    }
    info!(
        "Configuration loaded: Mode={:?}, Interval={}, Threshold={}",
        config.mode, config.candle_timeframe, config.volatility_threshold
    );

    let index = config.nse_index.clone();
    let app = Application::build(config)?;
    let report = app.run_once().await?;

    print_report(&index, &report);
    Ok(())
}

fn print_report(index: &str, report: &SessionReport) {
    println!("== {} ({} candles) ==", index, report.candles.len());
    match report.spot.change_pct {
        Some(pct) => println!("Spot price:      {} ({:+.2}%)", report.spot.current, pct.round_dp(2)),
        None => println!("Spot price:      {}", report.spot.current),
    }
    println!("Market Open at:  {}", report.levels.open);
    match &report.volatility {
        Some(vix) => println!(
            "Volatility:      {} ({:+.2})",
            vix.current,
            vix.change().round_dp(2)
        ),
        None => println!("Volatility:      N/A"),
    }
    println!();
    println!("Optimal Strike price for trade: {}", report.strike_price);
    println!("Resistance bar: {}", report.levels.resistance);
    println!("Support bar:    {}", report.levels.support);
    println!("(levels from the {} candle)", report.levels.basis);
    println!();

    match &report.outcome {
        ScanOutcome::Signals { calls, puts } => {
            print_table(
                calls,
                "Call Trades to be executed",
                "Refrain from buying Call Options",
            );
            println!();
            print_table(
                puts,
                "Put Trades to be executed",
                "Refrain from buying Put Options",
            );
        }
        ScanOutcome::Advisory(advisory) => println!("{}", advisory),
    }
}

fn print_table(signals: &[Signal], active: &str, empty: &str) {
    if signals.is_empty() {
        println!("{}", empty);
        return;
    }
    println!("{}", active);
    println!("{:<10} {:>14} {:>14}", "Time", "Strike Price", "Stoploss");
    for signal in signals {
        println!(
            "{:<10} {:>14} {:>14}",
            signal.time.format("%H:%M:%S").to_string(),
            signal.strike_price,
            signal.stop_loss
        );
    }
}
