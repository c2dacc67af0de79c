use crate::domain::market::session::SessionClock;
use crate::domain::trading::types::{OptionSide, ScanOutcome, SessionReport, Signal};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;
use rust_decimal::Decimal;

pub struct MetricView {
    pub icon: &'static str,
    pub title: &'static str,
    pub value: String,
    pub subtitle: Option<String>,
    pub color: egui::Color32,
}

pub struct SignalRow {
    pub time: String,
    pub strike_price: String,
    pub stop_loss: String,
}

pub struct SignalTableView {
    pub heading: &'static str,
    pub rows: Vec<SignalRow>,
}

pub struct LevelsView {
    pub strike: String,
    pub resistance: String,
    pub support: String,
    pub basis: String,
}

pub struct DashboardViewModel;

impl DashboardViewModel {
    pub fn get_metrics(report: &SessionReport) -> Vec<MetricView> {
        let (spot_delta, spot_color) = match report.spot.change_pct {
            Some(pct) => (Some(format_signed(pct, "%")), delta_color(pct)),
            None => (None, DesignSystem::TEXT_PRIMARY),
        };

        let (vix_value, vix_delta, vix_color) = match &report.volatility {
            Some(reading) => (
                format_decimal(reading.current),
                Some(format_signed(reading.change(), "")),
                delta_color(reading.change()),
            ),
            None => ("N/A".to_string(), None, DesignSystem::TEXT_MUTED),
        };

        vec![
            MetricView {
                icon: "📈",
                title: "Spot price",
                value: format_thousands(report.spot.current),
                subtitle: spot_delta,
                color: spot_color,
            },
            MetricView {
                icon: "🔔",
                title: "Market Open at",
                value: format_thousands(report.levels.open),
                subtitle: None,
                color: DesignSystem::TEXT_PRIMARY,
            },
            MetricView {
                icon: "🌊",
                title: "Volatility",
                value: vix_value,
                subtitle: vix_delta,
                color: vix_color,
            },
        ]
    }

    pub fn get_levels(report: &SessionReport) -> LevelsView {
        LevelsView {
            strike: format!(
                "Optimal Strike price for trade: {}",
                format_decimal(report.strike_price)
            ),
            resistance: format!("Resistance bar: {}", format_decimal(report.levels.resistance)),
            support: format!("Support bar: {}", format_decimal(report.levels.support)),
            basis: format!("Levels taken from the {} candle", report.levels.basis),
        }
    }

    /// Call and put tables, or `None` when an advisory replaces them.
    pub fn get_signal_tables(
        report: &SessionReport,
    ) -> Option<(SignalTableView, SignalTableView)> {
        match &report.outcome {
            ScanOutcome::Signals { calls, puts } => Some((
                Self::table(OptionSide::Call, calls),
                Self::table(OptionSide::Put, puts),
            )),
            ScanOutcome::Advisory(_) => None,
        }
    }

    pub fn get_advisory(report: &SessionReport) -> Option<String> {
        match &report.outcome {
            ScanOutcome::Advisory(advisory) => Some(advisory.to_string()),
            ScanOutcome::Signals { .. } => None,
        }
    }

    /// Chart heading dated on the exchange clock of the first candle.
    pub fn chart_title(report: &SessionReport, index: &str, clock: &SessionClock) -> String {
        let day = report
            .candles
            .first()
            .and_then(|c| clock.local_datetime(c.timestamp))
            .map(|dt| dt.format("%d-%m-%Y").to_string())
            .unwrap_or_default();
        format!("{} Candlestick Chart - {}", index, day)
    }

    pub fn axis_label(clock: &SessionClock, timestamp: i64) -> String {
        clock
            .local_datetime(timestamp)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }

    fn table(side: OptionSide, signals: &[Signal]) -> SignalTableView {
        let heading = match (side, signals.is_empty()) {
            (OptionSide::Call, false) => "Call Trades to be executed",
            (OptionSide::Call, true) => "Refrain from buying Call Options",
            (OptionSide::Put, false) => "Put Trades to be executed",
            (OptionSide::Put, true) => "Refrain from buying Put Options",
        };

        SignalTableView {
            heading,
            rows: signals
                .iter()
                .map(|s| SignalRow {
                    time: s.time.format("%H:%M:%S").to_string(),
                    strike_price: format_decimal(s.strike_price),
                    stop_loss: format_decimal(s.stop_loss),
                })
                .collect(),
        }
    }
}

fn delta_color(delta: Decimal) -> egui::Color32 {
    if delta >= Decimal::ZERO {
        DesignSystem::SUCCESS
    } else {
        DesignSystem::DANGER
    }
}

fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn format_signed(value: Decimal, suffix: &str) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded >= Decimal::ZERO { "+" } else { "" };
    format!("{}{:.2}{}", sign, rounded, suffix)
}

/// `22437.6` → `22,437.6`
pub fn format_thousands(value: Decimal) -> String {
    let raw = value.normalize().to_string();
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
