use crate::domain::market::session::SessionClock;
use crate::domain::trading::types::SessionReport;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::DashboardViewModel;
use eframe::egui;
use egui_plot::{BoxElem, BoxSpread, Legend, Line, Plot};
use rust_decimal::prelude::ToPrimitive;

/// Candlestick chart of the session with the resistance and support bars.
pub fn render_chart_panel(
    ui: &mut egui::Ui,
    report: &SessionReport,
    index: &str,
    clock: &SessionClock,
) {
    let Some(first) = report.candles.first() else {
        ui.centered_and_justified(|ui| {
            ui.label("No candles to chart");
        });
        return;
    };

    ui.label(
        egui::RichText::new(DashboardViewModel::chart_title(report, index, clock))
            .strong()
            .size(16.0)
            .color(DesignSystem::TEXT_PRIMARY),
    );
    ui.add_space(DesignSystem::SPACING_SMALL);

    // Candle width in plot units, slightly narrower than the bucket
    let bucket = report
        .candles
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp) as f64)
        .fold(f64::INFINITY, f64::min);
    let box_width = if bucket.is_finite() { bucket * 0.7 } else { 600.0 };

    let first_t = first.timestamp as f64;
    let last_t = report
        .candles
        .last()
        .map(|c| c.timestamp as f64)
        .unwrap_or(first_t);
    let resistance = report.levels.resistance.to_f64().unwrap_or(0.0);
    let support = report.levels.support.to_f64().unwrap_or(0.0);

    let clock = *clock;
    let height = ui.available_height() - 20.0;
    Plot::new("session_chart")
        .height(height.max(300.0))
        .show_grid([true, true])
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| {
            DashboardViewModel::axis_label(&clock, mark.value as i64)
        })
        .show(ui, |plot_ui| {
            let box_elems: Vec<BoxElem> = report
                .candles
                .iter()
                .map(|c| {
                    let open = c.open.to_f64().unwrap_or(0.0);
                    let close = c.close.to_f64().unwrap_or(0.0);
                    let high = c.high.to_f64().unwrap_or(0.0);
                    let low = c.low.to_f64().unwrap_or(0.0);
                    let color = if c.is_bullish() {
                        DesignSystem::SUCCESS
                    } else {
                        DesignSystem::DANGER
                    };
                    let mid = (open + close) / 2.0;

                    BoxElem::new(
                        c.timestamp as f64,
                        BoxSpread::new(low, open.min(close), mid, open.max(close), high),
                    )
                    .fill(color)
                    .stroke(egui::Stroke::new(1.0, color))
                    .box_width(box_width)
                })
                .collect();

            plot_ui.box_plot(egui_plot::BoxPlot::new(index, box_elems));

            plot_ui.line(
                Line::new("Resistance", vec![[first_t, resistance], [last_t, resistance]])
                    .color(DesignSystem::RESISTANCE)
                    .style(egui_plot::LineStyle::dashed_loose()),
            );
            plot_ui.line(
                Line::new("Support", vec![[first_t, support], [last_t, support]])
                    .color(DesignSystem::SUPPORT)
                    .style(egui_plot::LineStyle::dashed_loose()),
            );
        });
}
