use crate::application::system::Application;
use crate::domain::errors::PipelineError;
use crate::domain::market::session::SessionClock;
use crate::domain::trading::types::SessionReport;
use crate::interfaces::dashboard_components::chart_panel::render_chart_panel;
use crate::interfaces::dashboard_components::metrics_card::render_metric_card;
use crate::interfaces::dashboard_components::signal_table::render_signal_table;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::DashboardViewModel;
use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use std::collections::VecDeque;
use std::future::Future;
use tracing::{error, info};

const MAX_LOG_LINES: usize = 200;

type RunResult = Result<SessionReport, PipelineError>;

enum FetchState {
    Idle,
    Loading,
    Ready(Box<SessionReport>),
    Failed(PipelineError),
}

/// Desktop dashboard. Each fetch runs the pipeline once on the background
/// runtime and delivers the report back over a channel.
pub struct Dashboard {
    app: Application,
    runtime: tokio::runtime::Handle,
    result_tx: Sender<RunResult>,
    result_rx: Receiver<RunResult>,
    log_rx: Receiver<String>,
    logs: VecDeque<String>,
    state: FetchState,
    fetched_at: Option<DateTime<Local>>,
}

/// Runs the pipeline as its own task so a panic still yields a result.
async fn join_run<F>(run: F) -> RunResult
where
    F: Future<Output = RunResult> + Send + 'static,
{
    match tokio::spawn(run).await {
        Ok(result) => result,
        Err(e) => {
            error!("Dashboard: pipeline run aborted: {}", e);
            Err(PipelineError::unavailable(format!(
                "pipeline run aborted: {}",
                e
            )))
        }
    }
}

impl Dashboard {
    pub fn new(app: Application, runtime: tokio::runtime::Handle, log_rx: Receiver<String>) -> Self {
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        Self {
            app,
            runtime,
            result_tx,
            result_rx,
            log_rx,
            logs: VecDeque::with_capacity(MAX_LOG_LINES),
            state: FetchState::Idle,
            fetched_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    /// Starts one pipeline run unless one is already in flight.
    pub fn fetch(&mut self, ctx: &egui::Context) {
        if self.is_loading() {
            return;
        }
        info!("Dashboard: fetch requested");
        self.state = FetchState::Loading;

        let app = self.app.clone();
        let tx = self.result_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = join_run(async move { app.run_once().await }).await;
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    fn drain_channels(&mut self) {
        if let Ok(result) = self.result_rx.try_recv() {
            self.state = match result {
                Ok(report) => FetchState::Ready(Box::new(report)),
                Err(e) => FetchState::Failed(e),
            };
            self.fetched_at = Some(Local::now());
        }

        while let Ok(line) = self.log_rx.try_recv() {
            if self.logs.len() == MAX_LOG_LINES {
                self.logs.pop_front();
            }
            self.logs.push_back(line.trim_end().to_string());
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Navigate Your Trades");
                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "{} · {} candles · source: {}",
                        self.app.config.nse_index,
                        self.app.config.candle_timeframe,
                        self.app.pipeline().source_name()
                    ))
                    .color(DesignSystem::TEXT_SECONDARY),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let button = egui::Button::new(egui::RichText::new("Fetch").strong())
                        .fill(DesignSystem::ACCENT_PRIMARY);
                    if ui.add_enabled(!self.is_loading(), button).clicked() {
                        self.fetch(ui.ctx());
                    }

                    if self.is_loading() {
                        ui.spinner();
                        ui.label("Fetching data...");
                    } else if let Some(at) = self.fetched_at {
                        ui.label(
                            egui::RichText::new(format!("Fetched at {}", at.format("%H:%M:%S")))
                                .color(DesignSystem::TEXT_MUTED)
                                .small(),
                        );
                    }
                });
            });
        });
    }

    fn render_logs(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("System Logs").strong());
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.logs {
                            let color = if line.contains("ERROR") {
                                DesignSystem::DANGER
                            } else if line.contains("WARN") {
                                DesignSystem::WARNING
                            } else {
                                DesignSystem::TEXT_SECONDARY
                            };
                            ui.label(egui::RichText::new(line).monospace().size(11.0).color(color));
                        }
                    });
            });
    }

    fn render_report(
        ui: &mut egui::Ui,
        report: &SessionReport,
        index: &str,
        clock: &SessionClock,
    ) {
        // Metrics row
        ui.horizontal(|ui| {
            for metric in DashboardViewModel::get_metrics(report) {
                render_metric_card(ui, &metric);
                ui.add_space(DesignSystem::SPACING_SMALL);
            }
        });
        ui.add_space(DesignSystem::SPACING_MEDIUM);

        // Levels
        let levels = DashboardViewModel::get_levels(report);
        DesignSystem::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(
                egui::RichText::new(&levels.strike)
                    .size(20.0)
                    .strong()
                    .color(DesignSystem::TEXT_PRIMARY),
            );
            ui.label(
                egui::RichText::new(&levels.resistance)
                    .size(18.0)
                    .color(DesignSystem::RESISTANCE),
            );
            ui.label(
                egui::RichText::new(&levels.support)
                    .size(18.0)
                    .color(DesignSystem::SUPPORT),
            );
            ui.label(
                egui::RichText::new(&levels.basis)
                    .small()
                    .color(DesignSystem::TEXT_MUTED),
            );
        });
        ui.add_space(DesignSystem::SPACING_MEDIUM);

        // Signals or advisory
        if let Some((calls, puts)) = DashboardViewModel::get_signal_tables(report) {
            ui.columns(2, |cols| {
                render_signal_table(&mut cols[0], "call_signals", &calls);
                render_signal_table(&mut cols[1], "put_signals", &puts);
            });
        }
        if let Some(advisory) = DashboardViewModel::get_advisory(report) {
            ui.label(
                egui::RichText::new(advisory)
                    .size(20.0)
                    .strong()
                    .color(DesignSystem::WARNING),
            );
        }
        ui.add_space(DesignSystem::SPACING_MEDIUM);

        // Chart
        DesignSystem::card_frame().show(ui, |ui| {
            render_chart_panel(ui, report, index, clock);
        });
    }
}

impl eframe::App for Dashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- 1. Process results & logs ---
        self.drain_channels();

        // --- 2. Chrome ---
        self.render_top_bar(ctx);
        self.render_logs(ctx);

        // --- 3. Report ---
        egui::CentralPanel::default()
            .frame(DesignSystem::main_frame())
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match &self.state {
                    FetchState::Idle => {
                        ui.centered_and_justified(|ui| {
                            ui.label("Press Fetch to load the session.");
                        });
                    }
                    FetchState::Loading => {
                        ui.centered_and_justified(|ui| {
                            ui.spinner();
                        });
                    }
                    FetchState::Failed(e) => {
                        ui.colored_label(DesignSystem::DANGER, "No data");
                        ui.label(
                            egui::RichText::new(e.to_string()).color(DesignSystem::TEXT_SECONDARY),
                        );
                    }
                    FetchState::Ready(report) => {
                        Self::render_report(
                            ui,
                            report,
                            &self.app.config.nse_index,
                            &self.app.config.session_clock,
                        );
                    }
                });
            });
    }
}
